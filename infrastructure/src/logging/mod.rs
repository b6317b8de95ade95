//! Logging infrastructure: structured game logging and stats export.
//!
//! Provides [`JsonlGameLogger`], a JSONL file writer that implements the
//! [`GameLogger`](crew_application::GameLogger) port, and the per-agent
//! stats export written when a game finishes.

mod jsonl_logger;
mod stats_export;

pub use jsonl_logger::JsonlGameLogger;
pub use stats_export::{StatsExportError, export_stats, game_file_paths, render_stats};
