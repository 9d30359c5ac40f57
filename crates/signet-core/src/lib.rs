//! Core library for Signet: configuration, user and session storage, and the
//! sign-in / sign-up flow.

pub mod config;
pub mod controller;
pub mod flow;
pub mod logging;
pub mod session;
pub mod store;
