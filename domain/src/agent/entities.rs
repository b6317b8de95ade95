//! Agent domain entities
//!
//! [`Agent`] is owned by [`WorldState`](crate::world::WorldState); every field
//! that affects game invariants is only writable from inside the crate.

use super::perception::PerceptionLog;
use super::value_objects::{AgentId, AgentStatus, Faction};
use crate::game::action::ActionTag;
use crate::map::RoomId;
use serde::{Deserialize, Serialize};

/// Per-agent statistics accumulated over a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    /// Policy or model label driving the agent
    pub label: String,
    pub votes_cast: u32,
    pub votes_received: u32,
    pub correct_votes: u32,
    pub incorrect_votes: u32,
    pub skipped_votes: u32,
    /// Moves that actually changed room
    pub moves_made: u32,
    pub meetings_called: u32,
    pub eliminations: u32,
    pub bodies_reported: u32,
    pub rounds_survived: u32,
    pub times_eliminated: u32,
    pub ejections: u32,
    pub won_game: bool,
}

/// A body an agent has personally seen, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownBody {
    pub body: AgentId,
    pub room: RoomId,
}

/// Roster entry used to create an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: AgentId,
    pub faction: Faction,
    pub label: String,
    pub start_room: RoomId,
}

impl AgentSpec {
    pub fn new(id: impl Into<AgentId>, faction: Faction, start_room: impl Into<RoomId>) -> Self {
        Self {
            id: id.into(),
            faction,
            label: String::new(),
            start_room: start_room.into(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// A participant in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    faction: Faction,
    status: AgentStatus,
    location: RoomId,
    pub(crate) action_count: u32,
    pub(crate) last_action: Option<ActionTag>,
    pub(crate) button_used: bool,
    /// Tick of the last elimination this round, for the cooldown
    pub(crate) last_elimination_tick: Option<u32>,
    pub(crate) known_bodies: Vec<KnownBody>,
    pub(crate) perception: PerceptionLog,
    pub(crate) stats: AgentStats,
}

impl Agent {
    pub(crate) fn from_spec(spec: AgentSpec, perception_window: usize) -> Self {
        Self {
            id: spec.id,
            faction: spec.faction,
            status: AgentStatus::Active,
            location: spec.start_room,
            action_count: 0,
            last_action: None,
            button_used: false,
            last_elimination_tick: None,
            known_bodies: Vec::new(),
            perception: PerceptionLog::new(perception_window),
            stats: AgentStats {
                label: spec.label,
                ..Default::default()
            },
        }
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Current room; for terminal agents, the room they left play in.
    pub fn location(&self) -> &RoomId {
        &self.location
    }

    pub fn action_count(&self) -> u32 {
        self.action_count
    }

    pub fn last_action(&self) -> Option<ActionTag> {
        self.last_action
    }

    pub fn button_used(&self) -> bool {
        self.button_used
    }

    pub fn known_bodies(&self) -> &[KnownBody] {
        &self.known_bodies
    }

    pub fn perception(&self) -> &PerceptionLog {
        &self.perception
    }

    pub fn stats(&self) -> &AgentStats {
        &self.stats
    }

    pub(crate) fn set_location(&mut self, room: RoomId) {
        self.location = room;
    }

    /// Move to a terminal status. Returns false if already terminal.
    pub(crate) fn leave_play(&mut self, status: AgentStatus) -> bool {
        if !self.status.is_active() || status.is_active() {
            return false;
        }
        self.status = status;
        true
    }

    pub(crate) fn remember_body(&mut self, body: &AgentId, room: &RoomId) {
        let known = self
            .known_bodies
            .iter()
            .any(|kb| &kb.body == body && &kb.room == room);
        if !known {
            self.known_bodies.push(KnownBody {
                body: body.clone(),
                room: room.clone(),
            });
        }
    }

    /// Clear per-round transient fields.
    pub(crate) fn reset_round(&mut self) {
        self.action_count = 0;
        self.last_action = None;
        self.last_elimination_tick = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> Agent {
        Agent::from_spec(
            AgentSpec::new("Agent_0", Faction::Honest, "Admin").with_label("heuristic"),
            4,
        )
    }

    #[test]
    fn test_agent_from_spec() {
        let agent = agent();
        assert!(agent.is_active());
        assert_eq!(agent.location().as_str(), "Admin");
        assert_eq!(agent.stats().label, "heuristic");
        assert_eq!(agent.perception().window(), 4);
    }

    #[test]
    fn test_leave_play_is_one_way() {
        let mut agent = agent();
        assert!(agent.leave_play(AgentStatus::Eliminated));
        assert!(!agent.leave_play(AgentStatus::Ejected));
        assert_eq!(agent.status(), AgentStatus::Eliminated);
    }

    #[test]
    fn test_leave_play_rejects_active_target() {
        let mut agent = agent();
        assert!(!agent.leave_play(AgentStatus::Active));
        assert!(agent.is_active());
    }

    #[test]
    fn test_remember_body_deduplicates() {
        let mut agent = agent();
        let body = AgentId::new("Agent_4");
        let room = RoomId::new("Admin");
        agent.remember_body(&body, &room);
        agent.remember_body(&body, &room);
        assert_eq!(agent.known_bodies().len(), 1);
    }
}
