//! CLI command handlers.

pub mod config;
pub mod screen;
pub mod session;
