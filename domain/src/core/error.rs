//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Setup variants are fatal: a game with a malformed map or roster must not
/// start. The remaining variants guard world mutators against misuse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("A game needs at least 2 agents, got {0}")]
    TooFewAgents(usize),

    #[error("A game needs at least one adversarial agent")]
    NoAdversaries,

    #[error("Adversaries ({adversarial}) already match honest agents ({honest}) at setup")]
    AdversariesAtParity { honest: usize, adversarial: usize },

    #[error("Duplicate agent id: {0}")]
    DuplicateAgent(String),

    #[error("Room graph has no rooms")]
    EmptyMap,

    #[error("Room {room} lists unknown neighbor {neighbor}")]
    UnknownNeighbor { room: String, neighbor: String },

    #[error("Room {room} lists {neighbor} as adjacent but {neighbor} does not list {room}")]
    AsymmetricAdjacency { room: String, neighbor: String },

    #[error("Room graph is disconnected; unreachable from {start}: {}", unreachable.join(", "))]
    DisconnectedMap {
        start: String,
        unreachable: Vec<String>,
    },

    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Agent {0} is not active")]
    AgentNotActive(String),

    #[error("Agent {0} has no body to report")]
    NoBodyToReport(String),

    #[error("Invalid game rules: {0}")]
    InvalidRules(String),

    #[error("Illegal meeting transition from {from} to {to}")]
    IllegalMeetingTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl DomainError {
    /// Check if this error is a setup-time structural error
    pub fn is_setup_error(&self) -> bool {
        !matches!(
            self,
            DomainError::UnknownAgent(_)
                | DomainError::AgentNotActive(_)
                | DomainError::NoBodyToReport(_)
                | DomainError::IllegalMeetingTransition { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_map_display() {
        let error = DomainError::DisconnectedMap {
            start: "Cafeteria".to_string(),
            unreachable: vec!["Reactor".to_string(), "Security".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Room graph is disconnected; unreachable from Cafeteria: Reactor, Security"
        );
    }

    #[test]
    fn test_is_setup_error() {
        assert!(DomainError::NoAdversaries.is_setup_error());
        assert!(DomainError::TooFewAgents(1).is_setup_error());
        assert!(!DomainError::UnknownAgent("Agent_9".to_string()).is_setup_error());
        assert!(
            !DomainError::IllegalMeetingTransition {
                from: "idle",
                to: "closed"
            }
            .is_setup_error()
        );
    }
}
