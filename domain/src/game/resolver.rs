//! Resolution of one movement tick
//!
//! A tick resolves a batch of proposed actions in a fixed priority order:
//! eliminations, then at most one meeting trigger (reports before the button),
//! then moves. Eliminations run before any move, so every check sees the
//! positions agents held when the tick started.
//!
//! Reporting is itself a provider decision, so the resolver is staged: the
//! caller runs [`ActionResolver::resolve_eliminations`], asks each
//! [`ReportCandidate`]'s provider in order, commits the first accepted report
//! and then [`ActionResolver::complete`]s the remaining stages.
//! [`resolve_tick`] runs all stages with a synchronous report decision.

use crate::agent::{AgentId, Faction};
use crate::core::error::DomainError;
use crate::game::action::ProposedAction;
use crate::game::meeting::{Meeting, MeetingController, MeetingPhase, MeetingReason};
use crate::map::RoomId;
use crate::world::WorldState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Why a proposed action had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    ActorNotActive,
    EliminatedThisTick,
    NotAdversarial,
    TargetNotActive,
    TargetIsTeammate,
    NotColocated,
    Cooldown,
    BodyNotHere,
    AlreadyReported,
    ReportDeclined,
    NotInMeetingRoom,
    ButtonUsed,
    MeetingStarted,
    UnknownRoom,
    NotAdjacent,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::ActorNotActive => "actor not active",
            RejectReason::EliminatedThisTick => "eliminated this tick",
            RejectReason::NotAdversarial => "only adversaries can eliminate",
            RejectReason::TargetNotActive => "target not active",
            RejectReason::TargetIsTeammate => "target is a teammate",
            RejectReason::NotColocated => "target not in the same room",
            RejectReason::Cooldown => "eliminated in the previous tick",
            RejectReason::BodyNotHere => "body not in this room",
            RejectReason::AlreadyReported => "body already reported",
            RejectReason::ReportDeclined => "report declined",
            RejectReason::NotInMeetingRoom => "not in the meeting room",
            RejectReason::ButtonUsed => "button already used",
            RejectReason::MeetingStarted => "meeting already started",
            RejectReason::UnknownRoom => "unknown room",
            RejectReason::NotAdjacent => "room not adjacent",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    pub actor: AgentId,
    pub victim: AgentId,
    pub room: RoomId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub agent: AgentId,
    pub from: RoomId,
    pub to: RoomId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub agent: AgentId,
    pub action: ProposedAction,
    pub reason: RejectReason,
}

/// An agent standing next to unreported bodies, awaiting its decision to
/// report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCandidate {
    pub reporter: AgentId,
    /// Unreported bodies in the reporter's room
    pub bodies: Vec<AgentId>,
    pub room: RoomId,
    /// Body named by an explicit `Report` action
    pub requested: Option<AgentId>,
}

impl ReportCandidate {
    /// The body the meeting is called over: the requested one, else the
    /// first body in the room.
    pub fn body(&self) -> Option<&AgentId> {
        self.requested.as_ref().or_else(|| self.bodies.first())
    }
}

/// Everything that happened in one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub round: u32,
    pub tick: u32,
    pub eliminations: Vec<Elimination>,
    pub meeting: Option<Meeting>,
    pub moves: Vec<Movement>,
    pub rejected: Vec<Rejection>,
}

impl TickOutcome {
    pub fn meeting_started(&self) -> bool {
        self.meeting.is_some()
    }
}

/// Staged resolver for one tick's batch.
pub struct ActionResolver<'w> {
    world: &'w mut WorldState,
    batch: Vec<(AgentId, ProposedAction)>,
    eliminated: BTreeSet<AgentId>,
    outcome: TickOutcome,
}

impl<'w> ActionResolver<'w> {
    /// Start resolving `batch` as tick `tick` of the current round.
    ///
    /// Entries for unknown or terminal agents are rejected up front; the rest
    /// are counted against their agent's per-round action counter.
    pub fn new(
        world: &'w mut WorldState,
        tick: u32,
        batch: Vec<(AgentId, ProposedAction)>,
    ) -> Self {
        world.set_tick(tick);
        let mut outcome = TickOutcome {
            round: world.round(),
            tick,
            ..Default::default()
        };

        let mut accepted = Vec::with_capacity(batch.len());
        for (agent, action) in batch {
            if world.is_active(&agent) && world.record_action(&agent, action.tag()).is_ok() {
                accepted.push((agent, action));
            } else {
                outcome.rejected.push(Rejection {
                    agent,
                    action,
                    reason: RejectReason::ActorNotActive,
                });
            }
        }

        Self {
            world,
            batch: accepted,
            eliminated: BTreeSet::new(),
            outcome,
        }
    }

    fn reject(&mut self, agent: &AgentId, action: &ProposedAction, reason: RejectReason) {
        self.outcome.rejected.push(Rejection {
            agent: agent.clone(),
            action: action.clone(),
            reason,
        });
    }

    fn actions(&self, pick: fn(&ProposedAction) -> bool) -> Vec<(AgentId, ProposedAction)> {
        self.batch
            .iter()
            .filter(|(_, action)| pick(action))
            .cloned()
            .collect()
    }

    // ==================== Stage 1: Eliminations ====================

    /// Room of the elimination if it is legal.
    fn check_elimination(&self, actor: &AgentId, victim: &AgentId) -> Result<RoomId, RejectReason> {
        let tick = self.outcome.tick;
        let Some(a) = self.world.agent(actor) else {
            return Err(RejectReason::ActorNotActive);
        };
        if a.faction() != Faction::Adversarial {
            return Err(RejectReason::NotAdversarial);
        }
        let Some(v) = self.world.agent(victim).filter(|v| v.is_active()) else {
            return Err(RejectReason::TargetNotActive);
        };
        if !a.faction().can_eliminate(v.faction()) {
            return Err(RejectReason::TargetIsTeammate);
        }
        if a.location() != v.location() {
            return Err(RejectReason::NotColocated);
        }
        if tick > 0 && a.last_elimination_tick == Some(tick - 1) {
            return Err(RejectReason::Cooldown);
        }
        Ok(v.location().clone())
    }

    /// Commit every valid elimination in batch order.
    pub fn resolve_eliminations(&mut self) -> &[Elimination] {
        let tick = self.outcome.tick;
        for (actor, action) in self.actions(|a| matches!(a, ProposedAction::Eliminate(_))) {
            let ProposedAction::Eliminate(victim) = &action else {
                continue;
            };
            let room = match self.check_elimination(&actor, victim) {
                Ok(room) => room,
                Err(reason) => {
                    self.reject(&actor, &action, reason);
                    continue;
                }
            };
            if self.world.eliminate(victim, &actor).is_err() {
                self.reject(&actor, &action, RejectReason::TargetNotActive);
                continue;
            }
            if let Ok(agent) = self.world.agent_mut(&actor) {
                agent.last_elimination_tick = Some(tick);
            }
            self.eliminated.insert(victim.clone());
            self.outcome.eliminations.push(Elimination {
                actor,
                victim: victim.clone(),
                room,
            });
        }
        &self.outcome.eliminations
    }

    // ==================== Stage 2: Meeting Triggers ====================

    /// Agents that could start a meeting by reporting, in batch order.
    ///
    /// Every surviving actor standing next to an unreported body is a
    /// candidate, whatever it proposed. An explicit `Report` naming a body
    /// that is not in the actor's room is rejected here.
    pub fn report_candidates(&mut self) -> Vec<ReportCandidate> {
        let mut candidates = Vec::new();
        for (actor, action) in self.batch.clone() {
            let requested = match &action {
                ProposedAction::Report(body) => Some(body.clone()),
                _ => None,
            };
            if self.eliminated.contains(&actor) {
                if requested.is_some() {
                    self.reject(&actor, &action, RejectReason::EliminatedThisTick);
                }
                continue;
            }
            let Some(room) = self.world.agent(&actor).map(|a| a.location().clone()) else {
                continue;
            };
            let bodies: Vec<AgentId> = self
                .world
                .bodies(&room)
                .iter()
                .filter(|b| !self.world.is_reported(b))
                .cloned()
                .collect();

            if let Some(body) = &requested {
                if self.world.is_reported(body) {
                    self.reject(&actor, &action, RejectReason::AlreadyReported);
                    continue;
                }
                if !bodies.contains(body) {
                    self.reject(&actor, &action, RejectReason::BodyNotHere);
                    continue;
                }
            }
            if bodies.is_empty() {
                continue;
            }
            candidates.push(ReportCandidate {
                reporter: actor,
                bodies,
                room,
                requested,
            });
        }
        candidates
    }

    /// Read access to the world between stages.
    pub fn world(&self) -> &WorldState {
        self.world
    }

    pub fn meeting_started(&self) -> bool {
        self.world.meeting_phase() != MeetingPhase::Idle
    }

    /// Record that a reporter decided not to report. Only explicit reports
    /// show up as rejected.
    pub fn decline_report(&mut self, candidate: &ReportCandidate) {
        if let Some(body) = &candidate.requested {
            let action = ProposedAction::Report(body.clone());
            self.reject(&candidate.reporter, &action, RejectReason::ReportDeclined);
        }
    }

    /// Start the meeting for an accepted report.
    pub fn commit_report(&mut self, candidate: &ReportCandidate) -> Result<&Meeting, DomainError> {
        let body = candidate
            .body()
            .ok_or_else(|| DomainError::NoBodyToReport(candidate.reporter.to_string()))?;
        let reason = MeetingReason::BodyReport {
            body: body.clone(),
            room: candidate.room.clone(),
        };
        let meeting = MeetingController::trigger(self.world, &candidate.reporter, reason)?;
        Ok(&*self.outcome.meeting.insert(meeting.clone()))
    }

    /// Press the emergency button for the first eligible caller, unless a
    /// report already started a meeting.
    pub fn resolve_button(&mut self) -> Option<&Meeting> {
        for (actor, action) in self.actions(|a| matches!(a, ProposedAction::CallMeeting)) {
            if self.meeting_started() {
                self.reject(&actor, &action, RejectReason::MeetingStarted);
                continue;
            }
            if self.eliminated.contains(&actor) {
                self.reject(&actor, &action, RejectReason::EliminatedThisTick);
                continue;
            }
            let Some(agent) = self.world.agent(&actor) else {
                continue;
            };
            if agent.location() != &self.world.rules().meeting_room {
                self.reject(&actor, &action, RejectReason::NotInMeetingRoom);
                continue;
            }
            if agent.button_used() {
                self.reject(&actor, &action, RejectReason::ButtonUsed);
                continue;
            }
            match MeetingController::trigger(self.world, &actor, MeetingReason::EmergencyButton) {
                Ok(meeting) => self.outcome.meeting = Some(meeting.clone()),
                Err(_) => self.reject(&actor, &action, RejectReason::MeetingStarted),
            }
        }
        self.outcome.meeting.as_ref()
    }

    // ==================== Stage 3: Moves ====================

    /// Commit moves, or discard them all if a meeting started.
    pub fn resolve_moves(&mut self) -> &[Movement] {
        let meeting = self.meeting_started();
        for (actor, action) in self.actions(|a| matches!(a, ProposedAction::Move(_))) {
            let ProposedAction::Move(to) = &action else {
                continue;
            };
            if meeting {
                self.reject(&actor, &action, RejectReason::MeetingStarted);
                continue;
            }
            if self.eliminated.contains(&actor) {
                self.reject(&actor, &action, RejectReason::EliminatedThisTick);
                continue;
            }
            let Some(from) = self.world.agent(&actor).map(|a| a.location().clone()) else {
                continue;
            };
            if !self.world.graph().contains(to) {
                self.reject(&actor, &action, RejectReason::UnknownRoom);
                continue;
            }
            if !self.world.graph().is_adjacent(&from, to) {
                self.reject(&actor, &action, RejectReason::NotAdjacent);
                continue;
            }
            if let Ok(true) = self.world.move_agent(&actor, to) {
                self.outcome.moves.push(Movement {
                    agent: actor,
                    from,
                    to: to.clone(),
                });
            }
        }
        &self.outcome.moves
    }

    /// Commit the caller's report decision for `candidate`.
    pub fn decide_report(
        &mut self,
        candidate: &ReportCandidate,
        accepted: bool,
    ) -> Result<(), DomainError> {
        if accepted {
            self.commit_report(candidate)?;
        } else {
            self.decline_report(candidate);
        }
        Ok(())
    }

    /// Run the stages left after the report decisions: the button (unless a
    /// report started a meeting), then moves, then perception.
    pub fn complete(mut self) -> TickOutcome {
        if !self.meeting_started() {
            self.resolve_button();
        }
        self.resolve_moves();
        self.finish()
    }

    /// Record perception for every surviving agent and return the outcome.
    ///
    /// Bodies revealed by a meeting this tick are no longer on the map, but
    /// agents in their room still see them.
    pub fn finish(self) -> TickOutcome {
        let revealed = self
            .outcome
            .meeting
            .as_ref()
            .map(|m| m.revealed.as_slice())
            .unwrap_or_default();
        self.world.record_perception(revealed);
        self.outcome
    }
}

/// Resolve a whole tick, deciding reports with `decide_to_report`.
pub fn resolve_tick<F>(
    world: &mut WorldState,
    tick: u32,
    batch: Vec<(AgentId, ProposedAction)>,
    mut decide_to_report: F,
) -> Result<TickOutcome, DomainError>
where
    F: FnMut(&ReportCandidate) -> bool,
{
    let mut resolver = ActionResolver::new(world, tick, batch);
    resolver.resolve_eliminations();
    for candidate in resolver.report_candidates() {
        if resolver.meeting_started() {
            break;
        }
        let accepted = decide_to_report(&candidate);
        resolver.decide_report(&candidate, accepted)?;
    }
    Ok(resolver.complete())
}
