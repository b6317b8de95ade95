//! Application-level configuration.
//!
//! - [`ExecutionParams`]: engine loop control (decision timeout)

pub mod execution_params;

pub use execution_params::{DEFAULT_DECISION_TIMEOUT, ExecutionParams};
