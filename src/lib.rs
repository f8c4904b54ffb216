pub mod cli;
pub mod core;
pub mod error;
pub mod services;

// Re-export for convenience
pub use crate::core::controller::RoundController;
pub use crate::core::session::{GuessOutcome, Session};
