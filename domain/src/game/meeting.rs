//! Meeting state machine
//!
//! A meeting moves `Idle -> Triggered -> InDiscussion -> Closed` and is reset
//! to `Idle` when the round ends. The phase lives in the world's round state;
//! [`MeetingController`] is the only code that advances it.

use crate::agent::{AgentId, KnownBody};
use crate::core::error::DomainError;
use crate::map::RoomId;
use crate::world::{GamePhase, WorldState};
use serde::{Deserialize, Serialize};

/// Phase of the current round's meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingPhase {
    #[default]
    Idle,
    Triggered,
    InDiscussion,
    Closed,
}

impl MeetingPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingPhase::Idle => "idle",
            MeetingPhase::Triggered => "triggered",
            MeetingPhase::InDiscussion => "in_discussion",
            MeetingPhase::Closed => "closed",
        }
    }
}

/// What started a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeetingReason {
    BodyReport { body: AgentId, room: RoomId },
    EmergencyButton,
}

/// A meeting started during a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub round: u32,
    pub tick: u32,
    pub caller: AgentId,
    pub reason: MeetingReason,
    /// Every body that was on the map when the meeting started
    pub revealed: Vec<KnownBody>,
}

impl Meeting {
    /// Bodies revealed besides the reported one.
    pub fn other_victims(&self) -> impl Iterator<Item = &AgentId> {
        let reported = match &self.reason {
            MeetingReason::BodyReport { body, .. } => Some(body),
            MeetingReason::EmergencyButton => None,
        };
        self.revealed
            .iter()
            .map(|kb| &kb.body)
            .filter(move |body| Some(*body) != reported)
    }

    /// Human-readable reason shown to every agent at the start of discussion.
    pub fn summary(&self) -> String {
        let others: Vec<&str> = self.other_victims().map(AgentId::as_str).collect();
        let others = if others.is_empty() {
            "None".to_string()
        } else {
            others.join(", ")
        };
        match &self.reason {
            MeetingReason::BodyReport { body, room } => format!(
                "Meeting called by {}. Body reported: {} located in {}. Additional victims confirmed eliminated: {}",
                self.caller, body, room, others
            ),
            MeetingReason::EmergencyButton => format!(
                "Meeting called by {} via emergency button. Unreported eliminations confirmed this round: {}",
                self.caller, others
            ),
        }
    }
}

/// Drives the meeting phase of a [`WorldState`].
pub struct MeetingController;

impl MeetingController {
    /// `Idle -> Triggered`: record the caller, reveal and clear every body on
    /// the map, and halt movement for the round.
    pub fn trigger<'w>(
        world: &'w mut WorldState,
        caller: &AgentId,
        reason: MeetingReason,
    ) -> Result<&'w Meeting, DomainError> {
        Self::expect(world, MeetingPhase::Idle, MeetingPhase::Triggered)?;
        if !world.is_active(caller) {
            return Err(DomainError::AgentNotActive(caller.to_string()));
        }

        {
            let agent = world.agent_mut(caller)?;
            match &reason {
                MeetingReason::BodyReport { .. } => agent.stats.bodies_reported += 1,
                MeetingReason::EmergencyButton => {
                    agent.button_used = true;
                    agent.stats.meetings_called += 1;
                }
            }
        }

        let revealed = world.take_all_bodies();
        let meeting = Meeting {
            round: world.round(),
            tick: world.tick(),
            caller: caller.clone(),
            reason,
            revealed,
        };

        let state = &mut world.round_state;
        state.meeting_phase = MeetingPhase::Triggered;
        state.phase = GamePhase::Discussion;
        Ok(&*state.meeting.insert(meeting))
    }

    /// `Triggered -> InDiscussion`.
    pub fn begin_discussion(world: &mut WorldState) -> Result<(), DomainError> {
        Self::expect(world, MeetingPhase::Triggered, MeetingPhase::InDiscussion)?;
        world.round_state.meeting_phase = MeetingPhase::InDiscussion;
        world.round_state.phase = GamePhase::Discussion;
        Ok(())
    }

    /// Move from discussion to the vote without changing the meeting phase.
    pub fn open_vote(world: &mut WorldState) -> Result<(), DomainError> {
        Self::expect(world, MeetingPhase::InDiscussion, MeetingPhase::InDiscussion)?;
        world.round_state.phase = GamePhase::Voting;
        Ok(())
    }

    /// `InDiscussion -> Closed`, after the vote.
    pub fn close(world: &mut WorldState) -> Result<(), DomainError> {
        Self::expect(world, MeetingPhase::InDiscussion, MeetingPhase::Closed)?;
        world.round_state.meeting_phase = MeetingPhase::Closed;
        Ok(())
    }

    fn expect(
        world: &WorldState,
        from: MeetingPhase,
        to: MeetingPhase,
    ) -> Result<(), DomainError> {
        let current = world.meeting_phase();
        if current != from {
            return Err(DomainError::IllegalMeetingTransition {
                from: current.as_str(),
                to: to.as_str(),
            });
        }
        Ok(())
    }
}
