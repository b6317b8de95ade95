//! WorldState - the single mutable source of truth for a game.

use crate::agent::{
    Agent, AgentId, AgentSpec, AgentStatus, Faction, KnownBody, PerceptionEntry,
};
use crate::core::error::DomainError;
use crate::core::rules::{GameRules, validate_roster};
use crate::game::action::ActionTag;
use crate::game::meeting::{Meeting, MeetingPhase};
use crate::map::{RoomGraph, RoomId};
use crate::world::view::WorldView;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Movement,
    Discussion,
    Voting,
    /// The game has a result
    Resolved,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Movement => "movement",
            GamePhase::Discussion => "discussion",
            GamePhase::Voting => "voting",
            GamePhase::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Occupants and undiscovered bodies of one room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOccupancy {
    pub occupants: Vec<AgentId>,
    pub bodies: Vec<AgentId>,
}

/// Global per-round flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub round: u32,
    pub tick: u32,
    pub phase: GamePhase,
    pub meeting_phase: MeetingPhase,
    /// Meeting started this round, if any
    pub meeting: Option<Meeting>,
    /// Every victim surfaced to the whole population so far
    pub reported_victims: BTreeSet<AgentId>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            round: 0,
            tick: 0,
            phase: GamePhase::Movement,
            meeting_phase: MeetingPhase::Idle,
            meeting: None,
            reported_victims: BTreeSet::new(),
        }
    }
}

/// The game world.
///
/// Agents are stored in stable registry order (roster order), which is the
/// order every batch, speaking pass and ballot collection iterates in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldState {
    graph: RoomGraph,
    rules: GameRules,
    agents: Vec<Agent>,
    index: BTreeMap<AgentId, usize>,
    rooms: BTreeMap<RoomId, RoomOccupancy>,
    pub(crate) round_state: RoundState,
}

impl WorldState {
    /// Create the world from a validated map, rules and roster.
    ///
    /// Fails on any structural problem: bad budgets, a roster that is too
    /// small, has no adversaries or starts at parity, duplicate ids, or rooms
    /// that are not on the map.
    pub fn new(
        graph: RoomGraph,
        rules: GameRules,
        roster: Vec<AgentSpec>,
    ) -> Result<Self, DomainError> {
        rules.validate_budgets()?;

        let honest = roster
            .iter()
            .filter(|s| s.faction == Faction::Honest)
            .count();
        validate_roster(honest, roster.len() - honest)?;

        if !graph.contains(&rules.meeting_room) {
            return Err(DomainError::UnknownRoom(rules.meeting_room.to_string()));
        }

        let mut rooms: BTreeMap<RoomId, RoomOccupancy> = graph
            .rooms()
            .map(|room| (room.clone(), RoomOccupancy::default()))
            .collect();
        let mut index = BTreeMap::new();
        let mut agents = Vec::with_capacity(roster.len());

        for spec in roster {
            if index.contains_key(&spec.id) {
                return Err(DomainError::DuplicateAgent(spec.id.to_string()));
            }
            let Some(room) = rooms.get_mut(&spec.start_room) else {
                return Err(DomainError::UnknownRoom(spec.start_room.to_string()));
            };
            room.occupants.push(spec.id.clone());
            index.insert(spec.id.clone(), agents.len());
            agents.push(Agent::from_spec(spec, rules.perception_window));
        }

        Ok(Self {
            graph,
            rules,
            agents,
            index,
            rooms,
            round_state: RoundState::default(),
        })
    }

    // ==================== Queries ====================

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn round(&self) -> u32 {
        self.round_state.round
    }

    pub fn tick(&self) -> u32 {
        self.round_state.tick
    }

    pub fn phase(&self) -> GamePhase {
        self.round_state.phase
    }

    pub fn round_state(&self) -> &RoundState {
        &self.round_state
    }

    pub fn meeting_phase(&self) -> MeetingPhase {
        self.round_state.meeting_phase
    }

    pub fn meeting(&self) -> Option<&Meeting> {
        self.round_state.meeting.as_ref()
    }

    /// All agents in registry order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: &AgentId) -> Option<&Agent> {
        self.index.get(id).map(|&i| &self.agents[i])
    }

    pub fn active_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.is_active())
    }

    /// Ids of active agents in registry order.
    pub fn active_ids(&self) -> Vec<AgentId> {
        self.active_agents().map(|a| a.id().clone()).collect()
    }

    pub fn is_active(&self, id: &AgentId) -> bool {
        self.agent(id).is_some_and(Agent::is_active)
    }

    pub fn alive_count(&self, faction: Faction) -> usize {
        self.active_agents()
            .filter(|a| a.faction() == faction)
            .count()
    }

    pub fn occupants(&self, room: &RoomId) -> &[AgentId] {
        self.rooms
            .get(room)
            .map(|r| r.occupants.as_slice())
            .unwrap_or(&[])
    }

    pub fn bodies(&self, room: &RoomId) -> &[AgentId] {
        self.rooms
            .get(room)
            .map(|r| r.bodies.as_slice())
            .unwrap_or(&[])
    }

    /// Every undiscovered body on the map with its room.
    pub fn all_bodies(&self) -> Vec<KnownBody> {
        self.rooms
            .iter()
            .flat_map(|(room, occupancy)| {
                occupancy.bodies.iter().map(|body| KnownBody {
                    body: body.clone(),
                    room: room.clone(),
                })
            })
            .collect()
    }

    pub fn is_reported(&self, body: &AgentId) -> bool {
        self.round_state.reported_victims.contains(body)
    }

    /// The read-only projection handed to `id`'s decision provider.
    pub fn view_for(&self, id: &AgentId) -> Option<WorldView> {
        WorldView::for_agent(self, id)
    }

    // ==================== Mutators ====================

    fn index_of(&self, id: &AgentId) -> Result<usize, DomainError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| DomainError::UnknownAgent(id.to_string()))
    }

    fn active_index_of(&self, id: &AgentId) -> Result<usize, DomainError> {
        let i = self.index_of(id)?;
        if !self.agents[i].is_active() {
            return Err(DomainError::AgentNotActive(id.to_string()));
        }
        Ok(i)
    }

    fn room_mut(&mut self, room: &RoomId) -> Result<&mut RoomOccupancy, DomainError> {
        self.rooms
            .get_mut(room)
            .ok_or_else(|| DomainError::UnknownRoom(room.to_string()))
    }

    /// Move an active agent. Returns whether its room changed.
    ///
    /// Adjacency is the resolver's concern; this only keeps occupancy lists
    /// consistent with locations.
    pub fn move_agent(&mut self, id: &AgentId, to: &RoomId) -> Result<bool, DomainError> {
        let i = self.active_index_of(id)?;
        if !self.graph.contains(to) {
            return Err(DomainError::UnknownRoom(to.to_string()));
        }
        let from = self.agents[i].location().clone();
        if &from == to {
            return Ok(false);
        }

        self.room_mut(&from)?.occupants.retain(|o| o != id);
        self.room_mut(to)?.occupants.push(id.clone());
        let agent = &mut self.agents[i];
        agent.set_location(to.clone());
        agent.stats.moves_made += 1;
        Ok(true)
    }

    /// Eliminate `victim` on behalf of `actor`, leaving a body in its room.
    pub fn eliminate(&mut self, victim: &AgentId, actor: &AgentId) -> Result<(), DomainError> {
        let v = self.active_index_of(victim)?;
        let a = self.index_of(actor)?;
        let room = self.agents[v].location().clone();

        self.agents[v].leave_play(AgentStatus::Eliminated);
        self.agents[v].stats.times_eliminated += 1;
        self.agents[a].stats.eliminations += 1;

        let occupancy = self.room_mut(&room)?;
        occupancy.occupants.retain(|o| o != victim);
        occupancy.bodies.push(victim.clone());
        Ok(())
    }

    /// Remove an agent from play by vote.
    pub fn eject(&mut self, id: &AgentId) -> Result<(), DomainError> {
        let i = self.active_index_of(id)?;
        let room = self.agents[i].location().clone();

        self.agents[i].leave_play(AgentStatus::Ejected);
        self.agents[i].stats.ejections += 1;
        self.room_mut(&room)?.occupants.retain(|o| o != id);
        Ok(())
    }

    /// Take every undiscovered body off the map and mark it reported.
    pub fn take_all_bodies(&mut self) -> Vec<KnownBody> {
        let bodies = self.all_bodies();
        for body in &bodies {
            self.round_state.reported_victims.insert(body.body.clone());
        }
        self.clear_bodies();
        bodies
    }

    /// Clear every room's body list.
    pub fn clear_bodies(&mut self) {
        for occupancy in self.rooms.values_mut() {
            occupancy.bodies.clear();
        }
    }

    /// Record that an agent submitted a decision this tick.
    pub fn record_action(&mut self, id: &AgentId, tag: ActionTag) -> Result<u32, DomainError> {
        let i = self.index_of(id)?;
        let agent = &mut self.agents[i];
        agent.action_count += 1;
        agent.last_action = Some(tag);
        Ok(agent.action_count)
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        self.round_state.phase = phase;
    }

    pub fn set_tick(&mut self, tick: u32) {
        self.round_state.tick = tick;
    }

    /// Start a new round.
    ///
    /// Active agents are credited a survived round from round 2 on, and every
    /// agent's known bodies are forgotten.
    pub fn begin_round(&mut self, round: u32) {
        self.round_state.round = round;
        self.round_state.tick = 0;
        self.round_state.phase = GamePhase::Movement;
        for agent in &mut self.agents {
            if round > 1 && agent.is_active() {
                agent.stats.rounds_survived += 1;
            }
            agent.known_bodies.clear();
        }
    }

    /// Reset per-round transient state before the next round.
    pub fn end_round(&mut self) {
        for agent in &mut self.agents {
            agent.reset_round();
        }
        self.round_state.meeting_phase = MeetingPhase::Idle;
        self.round_state.meeting = None;
        if self.round_state.phase != GamePhase::Resolved {
            self.round_state.phase = GamePhase::Movement;
        }
    }

    /// Append what each active agent sees in its room to its perception log.
    /// Append a perception entry for every active agent.
    ///
    /// `revealed` holds the bodies a meeting took off the map this tick; those
    /// lying in an agent's room still count as seen.
    pub(crate) fn record_perception(&mut self, revealed: &[KnownBody]) {
        let round = self.round_state.round;
        let tick = self.round_state.tick;
        for i in 0..self.agents.len() {
            if !self.agents[i].is_active() {
                continue;
            }
            let room = self.agents[i].location().clone();
            let id = self.agents[i].id().clone();
            let agents_seen: Vec<AgentId> = self
                .occupants(&room)
                .iter()
                .filter(|o| **o != id)
                .cloned()
                .collect();
            let mut bodies_seen = self.bodies(&room).to_vec();
            for kb in revealed.iter().filter(|kb| kb.room == room) {
                if !bodies_seen.contains(&kb.body) {
                    bodies_seen.push(kb.body.clone());
                }
            }

            let agent = &mut self.agents[i];
            for body in &bodies_seen {
                agent.remember_body(body, &room);
            }
            agent.perception.push(PerceptionEntry {
                round,
                tick,
                room,
                agents_seen,
                bodies_seen,
            });
        }
    }

    pub(crate) fn agent_mut(&mut self, id: &AgentId) -> Result<&mut Agent, DomainError> {
        let i = self.index_of(id)?;
        Ok(&mut self.agents[i])
    }

    /// Write the final win flag into every agent's stats.
    pub fn finalize_stats(&mut self, winner: Faction) {
        for agent in &mut self.agents {
            agent.stats.won_game = agent.faction() == winner;
        }
        self.round_state.phase = GamePhase::Resolved;
    }
}
