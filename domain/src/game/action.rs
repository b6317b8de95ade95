//! Proposed movement-phase actions

use crate::agent::AgentId;
use crate::map::RoomId;
use serde::{Deserialize, Serialize};

/// An action an agent proposes for one movement tick.
///
/// Providers return this already structured; anything they cannot express
/// becomes [`ProposedAction::Stay`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum ProposedAction {
    Move(RoomId),
    Eliminate(AgentId),
    Report(AgentId),
    CallMeeting,
    #[default]
    Stay,
}

impl ProposedAction {
    pub fn tag(&self) -> ActionTag {
        match self {
            ProposedAction::Move(_) => ActionTag::Move,
            ProposedAction::Eliminate(_) => ActionTag::Eliminate,
            ProposedAction::Report(_) => ActionTag::Report,
            ProposedAction::CallMeeting => ActionTag::CallMeeting,
            ProposedAction::Stay => ActionTag::Stay,
        }
    }

    /// Target of the action as text, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            ProposedAction::Move(room) => Some(room.as_str()),
            ProposedAction::Eliminate(agent) | ProposedAction::Report(agent) => {
                Some(agent.as_str())
            }
            ProposedAction::CallMeeting | ProposedAction::Stay => None,
        }
    }
}

impl std::fmt::Display for ProposedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.target() {
            Some(target) => write!(f, "{} -> {}", self.tag(), target),
            None => write!(f, "{}", self.tag()),
        }
    }
}

/// Kind of the last action an agent took, without its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    Move,
    Eliminate,
    Report,
    CallMeeting,
    Stay,
}

impl ActionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTag::Move => "move",
            ActionTag::Eliminate => "eliminate",
            ActionTag::Report => "report",
            ActionTag::CallMeeting => "call_meeting",
            ActionTag::Stay => "stay",
        }
    }
}

impl std::fmt::Display for ActionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stay() {
        assert_eq!(ProposedAction::default(), ProposedAction::Stay);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ProposedAction::Move(RoomId::new("O2")).to_string(),
            "move -> O2"
        );
        assert_eq!(ProposedAction::CallMeeting.to_string(), "call_meeting");
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(ProposedAction::Eliminate(AgentId::new("Agent_2"))).unwrap();
        assert_eq!(json["action"], "eliminate");
        assert_eq!(json["target"], "Agent_2");
    }
}
