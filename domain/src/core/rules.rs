//! Game rules value object
//!
//! [`GameRules`] holds the budgets and roster shape that stay fixed for the
//! whole game. They are loaded once before the engine is built and never
//! mutated afterwards.

use super::error::DomainError;
use crate::map::RoomId;
use serde::{Deserialize, Serialize};

/// Number of rounds played when nothing else is configured.
pub const DEFAULT_ROUND_BUDGET: u32 = 10;
/// Movement ticks per round before a forced round end.
pub const DEFAULT_TICKS_PER_ROUND: u32 = 4;
/// Size of each agent's recent perception window.
pub const DEFAULT_PERCEPTION_WINDOW: usize = 8;

/// Static rules for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    /// Rounds played before honest agents win by default
    pub round_budget: u32,
    /// Movement ticks per round
    pub ticks_per_round: u32,
    /// Number of honest agents in the roster
    pub honest_count: usize,
    /// Number of adversarial agents in the roster
    pub adversarial_count: usize,
    /// The only room where the emergency button can be pressed
    pub meeting_room: RoomId,
    /// Maximum perception entries kept per agent
    pub perception_window: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            round_budget: DEFAULT_ROUND_BUDGET,
            ticks_per_round: DEFAULT_TICKS_PER_ROUND,
            honest_count: 8,
            adversarial_count: 2,
            meeting_room: RoomId::new("Cafeteria"),
            perception_window: DEFAULT_PERCEPTION_WINDOW,
        }
    }
}

impl GameRules {
    // ==================== Builder Methods ====================

    pub fn with_round_budget(mut self, rounds: u32) -> Self {
        self.round_budget = rounds;
        self
    }

    pub fn with_ticks_per_round(mut self, ticks: u32) -> Self {
        self.ticks_per_round = ticks;
        self
    }

    pub fn with_roster(mut self, honest: usize, adversarial: usize) -> Self {
        self.honest_count = honest;
        self.adversarial_count = adversarial;
        self
    }

    pub fn with_meeting_room(mut self, room: impl Into<RoomId>) -> Self {
        self.meeting_room = room.into();
        self
    }

    pub fn with_perception_window(mut self, window: usize) -> Self {
        self.perception_window = window;
        self
    }

    /// Total number of agents in the roster
    pub fn total_agents(&self) -> usize {
        self.honest_count + self.adversarial_count
    }

    /// Validate budgets and roster shape.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.validate_budgets()?;
        validate_roster(self.honest_count, self.adversarial_count)
    }

    /// Validate the round, tick and perception budgets only.
    pub fn validate_budgets(&self) -> Result<(), DomainError> {
        if self.round_budget == 0 {
            return Err(DomainError::InvalidRules(
                "round_budget must be at least 1".to_string(),
            ));
        }
        if self.ticks_per_round == 0 {
            return Err(DomainError::InvalidRules(
                "ticks_per_round must be at least 1".to_string(),
            ));
        }
        if self.perception_window == 0 {
            return Err(DomainError::InvalidRules(
                "perception_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check that a roster describes a game that is neither ill-defined nor
/// already decided.
pub fn validate_roster(honest: usize, adversarial: usize) -> Result<(), DomainError> {
    let total = honest + adversarial;
    if total < 2 {
        return Err(DomainError::TooFewAgents(total));
    }
    if adversarial == 0 {
        return Err(DomainError::NoAdversaries);
    }
    if adversarial >= honest {
        return Err(DomainError::AdversariesAtParity {
            honest,
            adversarial,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        let rules = GameRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.total_agents(), 10);
    }

    #[test]
    fn test_zero_adversaries_rejected() {
        let rules = GameRules::default().with_roster(5, 0);
        assert_eq!(rules.validate(), Err(DomainError::NoAdversaries));
    }

    #[test]
    fn test_too_few_agents_rejected() {
        assert_eq!(validate_roster(0, 1), Err(DomainError::TooFewAgents(1)));
    }

    #[test]
    fn test_parity_at_setup_rejected() {
        assert_eq!(
            validate_roster(2, 2),
            Err(DomainError::AdversariesAtParity {
                honest: 2,
                adversarial: 2
            })
        );
    }

    #[test]
    fn test_zero_budgets_rejected() {
        assert!(GameRules::default().with_round_budget(0).validate().is_err());
        assert!(GameRules::default().with_ticks_per_round(0).validate().is_err());
        assert!(GameRules::default().with_perception_window(0).validate().is_err());
    }
}
