//! Read-only, per-agent projection of the world handed to decision providers.

use super::state::{GamePhase, WorldState};
use crate::agent::{
    AgentId, AgentStats, AgentStatus, Faction, KnownBody, PerceptionEntry,
};
use crate::game::action::ActionTag;
use crate::map::RoomId;
use serde::{Deserialize, Serialize};

/// A room as one agent sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub room: RoomId,
    /// Active agents in the room, excluding the viewer
    pub occupants: Vec<AgentId>,
    /// Undiscovered bodies; always empty for rooms other than the viewer's
    pub bodies: Vec<AgentId>,
}

/// Status of a fellow adversary, visible only to adversaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeammateView {
    pub id: AgentId,
    pub status: AgentStatus,
}

/// Public facts about the meeting in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingBrief {
    pub caller: AgentId,
    pub summary: String,
    pub revealed: Vec<KnownBody>,
}

/// What one agent is allowed to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    pub id: AgentId,
    pub faction: Faction,
    pub status: AgentStatus,
    pub round: u32,
    pub round_budget: u32,
    pub tick: u32,
    pub phase: GamePhase,
    pub meeting_room: RoomId,
    pub button_used: bool,
    pub last_action: Option<ActionTag>,
    pub current_room: RoomView,
    pub adjacent_rooms: Vec<RoomView>,
    pub known_bodies: Vec<KnownBody>,
    pub recent_perception: Vec<PerceptionEntry>,
    /// Active agents, in registry order
    pub active_agents: Vec<AgentId>,
    /// Adversaries only: remaining honest agents
    pub honest_remaining: Option<usize>,
    /// Adversaries only: every other adversary and its status
    pub teammates: Vec<TeammateView>,
    pub meeting: Option<MeetingBrief>,
    pub stats: AgentStats,
}

impl WorldView {
    /// Build the view of `id`, or `None` if no such agent exists.
    pub fn for_agent(world: &WorldState, id: &AgentId) -> Option<Self> {
        let me = world.agent(id)?;
        let room = me.location().clone();

        let current_room = RoomView {
            occupants: others(world.occupants(&room), id),
            bodies: world.bodies(&room).to_vec(),
            room: room.clone(),
        };
        let adjacent_rooms = world
            .graph()
            .neighbors(&room)
            .iter()
            .map(|neighbor| RoomView {
                room: neighbor.clone(),
                occupants: others(world.occupants(neighbor), id),
                bodies: Vec::new(),
            })
            .collect();

        let adversarial = me.faction() == Faction::Adversarial;
        let teammates = if adversarial {
            world
                .agents()
                .iter()
                .filter(|a| a.faction() == Faction::Adversarial && a.id() != id)
                .map(|a| TeammateView {
                    id: a.id().clone(),
                    status: a.status(),
                })
                .collect()
        } else {
            Vec::new()
        };

        Some(Self {
            id: id.clone(),
            faction: me.faction(),
            status: me.status(),
            round: world.round(),
            round_budget: world.rules().round_budget,
            tick: world.tick(),
            phase: world.phase(),
            meeting_room: world.rules().meeting_room.clone(),
            button_used: me.button_used(),
            last_action: me.last_action(),
            current_room,
            adjacent_rooms,
            known_bodies: me.known_bodies().to_vec(),
            recent_perception: me.perception().entries().cloned().collect(),
            active_agents: world.active_ids(),
            honest_remaining: adversarial.then(|| world.alive_count(Faction::Honest)),
            teammates,
            meeting: world.meeting().map(|m| MeetingBrief {
                caller: m.caller.clone(),
                summary: m.summary(),
                revealed: m.revealed.clone(),
            }),
            stats: me.stats().clone(),
        })
    }

    pub fn location(&self) -> &RoomId {
        &self.current_room.room
    }

    pub fn can_move_to(&self, room: &RoomId) -> bool {
        self.adjacent_rooms.iter().any(|r| &r.room == room)
    }

    pub fn in_meeting_room(&self) -> bool {
        self.current_room.room == self.meeting_room
    }

    /// Whether the emergency button is available to this agent right now.
    pub fn can_call_meeting(&self) -> bool {
        self.in_meeting_room() && !self.button_used
    }

    pub fn is_teammate(&self, id: &AgentId) -> bool {
        self.teammates.iter().any(|t| &t.id == id)
    }

    /// Agents this one may vote for (everyone active but itself).
    pub fn vote_candidates(&self) -> impl Iterator<Item = &AgentId> {
        self.active_agents.iter().filter(move |a| **a != self.id)
    }
}

fn others(occupants: &[AgentId], me: &AgentId) -> Vec<AgentId> {
    occupants.iter().filter(|o| *o != me).cloned().collect()
}
