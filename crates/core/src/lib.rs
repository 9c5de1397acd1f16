//! Core business logic for phinex.

pub mod services;

pub use services::*;
