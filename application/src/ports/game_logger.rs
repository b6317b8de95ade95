//! Port for structured game event logging.
//!
//! Defines the [`GameLogger`] trait for recording game events (actions,
//! eliminations, meetings, utterances, ballots, results) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! game record in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured game event for logging.
pub struct GameEvent {
    /// Event type identifier (e.g., "round_started", "vote", "game_over").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl GameEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging game events.
///
/// Implementations write each event as a single append-only record. The
/// `log` method is synchronous and non-fallible; logging failures never stop
/// a game.
pub trait GameLogger: Send + Sync {
    /// Record a game event.
    fn log(&self, event: GameEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoGameLogger;

impl GameLogger for NoGameLogger {
    fn log(&self, _event: GameEvent) {}
}
