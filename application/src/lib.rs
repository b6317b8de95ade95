//! Application layer for byzantine-crew
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_DECISION_TIMEOUT, ExecutionParams};
pub use ports::{
    decision_provider::{DecisionProvider, ProviderError, ProviderFactory},
    game_logger::{GameEvent, GameLogger, NoGameLogger},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::run_game::{
    AgentSummary, GameReport, MeetingRecord, RoundRecord, RunGameError, RunGameInput,
    RunGameUseCase,
};
pub use use_cases::setup::seeded_roster;
