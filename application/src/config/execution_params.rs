//! Execution parameters for the game loop.
//!
//! [`ExecutionParams`] groups the parameters that control how
//! [`RunGameUseCase`](crate::use_cases::run_game::RunGameUseCase) talks to
//! decision providers. Game rules themselves live in the domain
//! ([`GameRules`](crew_domain::GameRules)).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time a provider gets for a single decision.
pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Timeout for each provider call; `None` waits indefinitely.
    pub decision_timeout: Option<Duration>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            decision_timeout: Some(DEFAULT_DECISION_TIMEOUT),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_decision_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.decision_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.decision_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default().with_decision_timeout(None);
        assert!(params.decision_timeout.is_none());
    }
}
