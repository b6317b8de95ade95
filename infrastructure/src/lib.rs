//! Infrastructure layer for byzantine-crew
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, the JSONL game
//! logger and the decision providers.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGameConfig, FileMapConfig,
    FileOutputConfig, FileOutputFormat, FileProvidersConfig, ProviderKind,
};
pub use logging::{JsonlGameLogger, StatsExportError, export_stats, game_file_paths};
pub use providers::{
    CommandGenerator, HeuristicFactory, HeuristicProvider, ProviderSetupError, RoutingFactory,
    TextDecisionProvider, TextGenerator,
};
