//! Agent value objects - immutable identity types.
//!
//! - [`AgentId`] - stable identifier of an agent for the whole game
//! - [`Faction`] - the hidden team an agent belongs to
//! - [`AgentStatus`] - whether an agent is still in play

use serde::{Deserialize, Serialize};

/// Unique identifier of an agent (e.g. `Agent_3`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Conventional roster name for the agent at `index`.
    pub fn numbered(index: usize) -> Self {
        Self(format!("Agent_{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for AgentId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team alignment of an agent, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    /// Majority faction; wins by ejecting every adversary
    Honest,
    /// Minority faction; wins by reaching parity with honest agents
    Adversarial,
}

impl Faction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Faction::Honest => "honest",
            Faction::Adversarial => "adversarial",
        }
    }

    /// Whether an agent of this faction may eliminate an agent of `target`.
    ///
    /// Only adversaries eliminate, and never a teammate.
    pub fn can_eliminate(&self, target: Faction) -> bool {
        matches!((self, target), (Faction::Adversarial, Faction::Honest))
    }

    /// Whether voting against `target` serves this faction's goal.
    pub fn is_correct_vote(&self, target: Faction) -> bool {
        *self != target
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Honest => write!(f, "Honest"),
            Faction::Adversarial => write!(f, "Adversarial"),
        }
    }
}

/// Lifecycle status of an agent.
///
/// Transitions only from `Active` to exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    /// Removed by an adversary during movement
    Eliminated,
    /// Removed by a meeting vote
    Ejected,
}

impl AgentStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, AgentStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Active => "active",
            AgentStatus::Eliminated => "eliminated",
            AgentStatus::Ejected => "ejected",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_agent_id() {
        assert_eq!(AgentId::numbered(3).as_str(), "Agent_3");
    }

    #[test]
    fn test_only_adversaries_eliminate_honest() {
        assert!(Faction::Adversarial.can_eliminate(Faction::Honest));
        assert!(!Faction::Adversarial.can_eliminate(Faction::Adversarial));
        assert!(!Faction::Honest.can_eliminate(Faction::Adversarial));
        assert!(!Faction::Honest.can_eliminate(Faction::Honest));
    }

    #[test]
    fn test_vote_correctness_table() {
        assert!(Faction::Honest.is_correct_vote(Faction::Adversarial));
        assert!(!Faction::Honest.is_correct_vote(Faction::Honest));
        assert!(Faction::Adversarial.is_correct_vote(Faction::Honest));
        assert!(!Faction::Adversarial.is_correct_vote(Faction::Adversarial));
    }

    #[test]
    fn test_status_serialize_snake_case() {
        let json = serde_json::to_string(&AgentStatus::Ejected).unwrap();
        assert_eq!(json, "\"ejected\"");
        assert!(AgentStatus::Eliminated.is_terminal());
    }
}
