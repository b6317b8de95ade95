//! Presentation layer for byzantine-crew
//!
//! This crate contains CLI definitions, report formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, ProviderChoice};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressMode, ProgressReporter, SimpleProgress};
