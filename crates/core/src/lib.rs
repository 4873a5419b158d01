//! Core business logic for reelboard.

pub mod services;

pub use services::*;
