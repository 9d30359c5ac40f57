//! Text input slice.

mod field;

pub use field::TextField;
