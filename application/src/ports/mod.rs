//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod decision_provider;
pub mod game_logger;
pub mod progress;
