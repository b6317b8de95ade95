//! Run Game use case
//!
//! Drives a whole game: seeded setup, rounds of movement ticks, meetings
//! (discussion then vote) and the final result. Provider calls are awaited
//! one at a time in registry order; any failure or timeout is replaced by a
//! safe default so a round always completes.

use crate::config::ExecutionParams;
use crate::ports::decision_provider::{DecisionProvider, ProviderError, ProviderFactory};
use crate::ports::game_logger::{GameEvent, GameLogger, NoGameLogger};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::setup::seeded_roster;
use chrono::{DateTime, Utc};
use crew_domain::game::{evaluate, evaluate_final, speaking_order};
use crew_domain::{
    ActionResolver, Agent, AgentId, AgentSpec, AgentStats, AgentStatus, DISCUSSION_PASSES,
    DomainError, Elimination, Faction, GameOutcome, GameRules, Meeting, MeetingController,
    MeetingPhase, ProposedAction, RoomGraph, RoomId, TickOutcome, Transcript, VoteResult,
    VoteTally, VoteTarget, WorldState,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type Providers = BTreeMap<AgentId, Arc<dyn DecisionProvider>>;

/// Errors that can occur while running a game
#[derive(Error, Debug)]
pub enum RunGameError {
    #[error("Game rule violation: {0}")]
    Domain(#[from] DomainError),

    #[error("No decision provider for agent {0}")]
    MissingProvider(String),

    #[error("Game cancelled")]
    Cancelled,
}

impl RunGameError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunGameError::Cancelled)
    }

    /// Check if the game was refused at setup
    pub fn is_setup_error(&self) -> bool {
        matches!(self, RunGameError::Domain(e) if e.is_setup_error())
    }
}

/// Input for the RunGame use case
#[derive(Debug, Clone)]
pub struct RunGameInput {
    pub rules: GameRules,
    pub graph: RoomGraph,
    /// Seed for faction and start room assignment
    pub seed: u64,
    /// Explicit roster; replaces the seeded one when set
    pub roster: Option<Vec<AgentSpec>>,
}

impl RunGameInput {
    pub fn new(rules: GameRules, graph: RoomGraph, seed: u64) -> Self {
        Self {
            rules,
            graph,
            seed,
            roster: None,
        }
    }

    pub fn with_roster(mut self, roster: Vec<AgentSpec>) -> Self {
        self.roster = Some(roster);
        self
    }
}

/// A meeting with its discussion and vote.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingRecord {
    pub meeting: Meeting,
    pub transcript: Transcript,
    pub vote: VoteResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    pub round: u32,
    pub ticks_played: u32,
    pub eliminations: Vec<Elimination>,
    pub meeting: Option<MeetingRecord>,
}

/// Final state of one agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub id: AgentId,
    pub faction: Faction,
    pub status: AgentStatus,
    pub location: RoomId,
    pub stats: AgentStats,
}

impl From<&Agent> for AgentSummary {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id().clone(),
            faction: agent.faction(),
            status: agent.status(),
            location: agent.location().clone(),
            stats: agent.stats().clone(),
        }
    }
}

/// Everything a finished game produced.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: GameOutcome,
    pub rounds: Vec<RoundRecord>,
    pub agents: Vec<AgentSummary>,
    /// Final world, for inspection and replay comparison
    #[serde(skip)]
    pub world: WorldState,
}

impl GameReport {
    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }

    pub fn meetings(&self) -> impl Iterator<Item = &MeetingRecord> {
        self.rounds.iter().filter_map(|r| r.meeting.as_ref())
    }
}

/// Use case for running one game
pub struct RunGameUseCase {
    factory: Arc<dyn ProviderFactory>,
    logger: Arc<dyn GameLogger>,
    params: ExecutionParams,
    cancellation_token: Option<CancellationToken>,
}

impl RunGameUseCase {
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            factory,
            logger: Arc::new(NoGameLogger),
            params: ExecutionParams::default(),
            cancellation_token: None,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_logger(mut self, logger: Arc<dyn GameLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunGameInput) -> Result<GameReport, RunGameError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunGameInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<GameReport, RunGameError> {
        let seed = input.seed;
        let started_at = Utc::now();
        let (mut world, providers) = self.setup(input)?;
        let budget = world.rules().round_budget;

        info!(
            "Starting game with {} agents ({} adversarial), {} rounds, seed {}",
            world.agents().len(),
            world.alive_count(Faction::Adversarial),
            budget,
            seed
        );
        self.log_game_started(&world, seed);
        progress.on_game_start(budget, world.agents().len());

        let mut rounds = Vec::new();
        let mut outcome = None;
        for round in 1..=budget {
            self.check_cancelled()?;
            let (record, result) = self
                .play_round(&mut world, &providers, round, progress)
                .await?;
            rounds.push(record);
            progress.on_round_complete(round);

            if result.is_some() {
                outcome = result;
                break;
            }
            world.end_round();
        }

        let outcome = match outcome {
            Some(outcome) => outcome,
            None => evaluate_final(&world),
        };
        world.finalize_stats(outcome.winner);

        info!(
            "Game over in round {}: {} wins ({})",
            outcome.round,
            outcome.winner,
            outcome.reason.as_str()
        );
        let agents: Vec<AgentSummary> = world.agents().iter().map(AgentSummary::from).collect();
        self.logger.log(GameEvent::new(
            "game_over",
            json!({
                "winner": outcome.winner,
                "reason": outcome.reason,
                "round": outcome.round,
                "honest_remaining": outcome.honest_remaining,
                "adversarial_remaining": outcome.adversarial_remaining,
                "agents": agents,
            }),
        ));
        progress.on_game_over(&outcome);

        Ok(GameReport {
            seed,
            started_at,
            finished_at: Utc::now(),
            outcome,
            rounds,
            agents,
            world,
        })
    }

    /// Build the roster, attach providers and create the world.
    fn setup(&self, input: RunGameInput) -> Result<(WorldState, Providers), RunGameError> {
        let roster = match input.roster {
            Some(roster) => roster,
            None => seeded_roster(&input.rules, &input.graph, input.seed),
        };

        let mut providers = Providers::new();
        let roster: Vec<AgentSpec> = roster
            .into_iter()
            .map(|spec| {
                let provider = self.factory.create(&spec.id, spec.faction);
                let spec = if spec.label.is_empty() {
                    let label = provider.label().to_string();
                    spec.with_label(label)
                } else {
                    spec
                };
                providers.insert(spec.id.clone(), provider);
                spec
            })
            .collect();

        let world = WorldState::new(input.graph, input.rules, roster)?;
        Ok((world, providers))
    }

    // ==================== Rounds ====================

    async fn play_round(
        &self,
        world: &mut WorldState,
        providers: &Providers,
        round: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<(RoundRecord, Option<GameOutcome>), RunGameError> {
        world.begin_round(round);
        info!(
            "Round {} started ({} agents active)",
            round,
            world.active_agents().count()
        );
        self.logger.log(GameEvent::new(
            "round_started",
            json!({ "round": round, "active": world.active_ids() }),
        ));
        progress.on_round_start(round);

        let mut record = RoundRecord {
            round,
            ticks_played: 0,
            eliminations: Vec::new(),
            meeting: None,
        };

        for tick in 1..=world.rules().ticks_per_round {
            let outcome = self.play_tick(world, providers, round, tick).await?;
            record.ticks_played = tick;
            record
                .eliminations
                .extend(outcome.eliminations.iter().cloned());
            progress.on_tick(&outcome);
            if let Some(meeting) = &outcome.meeting {
                progress.on_meeting(meeting);
            }

            if let Some(result) = evaluate(world, round) {
                self.log_round_result(world, &record, Some(&result));
                return Ok((record, Some(result)));
            }
            if outcome.meeting_started() {
                break;
            }
        }

        if world.meeting_phase() == MeetingPhase::Triggered {
            let meeting = self.run_meeting(world, providers, round, progress).await?;
            record.meeting = Some(meeting);
        }

        let result = evaluate(world, round);
        self.log_round_result(world, &record, result.as_ref());
        Ok((record, result))
    }

    async fn play_tick(
        &self,
        world: &mut WorldState,
        providers: &Providers,
        round: u32,
        tick: u32,
    ) -> Result<TickOutcome, RunGameError> {
        world.set_tick(tick);

        let mut batch = Vec::new();
        for id in world.active_ids() {
            let provider = provider_for(providers, &id)?;
            let Some(view) = world.view_for(&id) else {
                continue;
            };
            let action = self
                .guarded(
                    &id,
                    "choose_action",
                    provider.choose_action(&view, round),
                    ProposedAction::Stay,
                )
                .await?;
            self.logger.log(GameEvent::new(
                "agent_action",
                json!({
                    "round": round,
                    "tick": tick,
                    "agent": id,
                    "room": view.location(),
                    "action": action,
                }),
            ));
            batch.push((id, action));
        }

        let mut resolver = ActionResolver::new(world, tick, batch);
        resolver.resolve_eliminations();
        for candidate in resolver.report_candidates() {
            if resolver.meeting_started() {
                break;
            }
            let provider = provider_for(providers, &candidate.reporter)?;
            let Some(view) = resolver.world().view_for(&candidate.reporter) else {
                continue;
            };
            let report = self
                .guarded(
                    &candidate.reporter,
                    "decide_to_report",
                    provider.decide_to_report(&candidate.bodies, &candidate.room, &view, round),
                    false,
                )
                .await?;
            resolver.decide_report(&candidate, report)?;
        }
        let outcome = resolver.complete();

        for rejection in &outcome.rejected {
            debug!(
                "Round {} tick {}: {} {} rejected ({})",
                round, tick, rejection.agent, rejection.action, rejection.reason
            );
        }
        for elimination in &outcome.eliminations {
            info!(
                "Round {} tick {}: {} eliminated {} in {}",
                round, tick, elimination.actor, elimination.victim, elimination.room
            );
            self.logger.log(GameEvent::new(
                "elimination",
                json!({ "round": round, "tick": tick, "elimination": elimination }),
            ));
        }
        if let Some(meeting) = &outcome.meeting {
            info!("Round {} tick {}: {}", round, tick, meeting.summary());
            self.logger.log(GameEvent::new(
                "meeting_called",
                json!({
                    "round": round,
                    "tick": tick,
                    "caller": meeting.caller,
                    "reason": meeting.reason,
                    "revealed": meeting.revealed,
                    "summary": meeting.summary(),
                }),
            ));
        }
        Ok(outcome)
    }

    // ==================== Meetings ====================

    async fn run_meeting(
        &self,
        world: &mut WorldState,
        providers: &Providers,
        round: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<MeetingRecord, RunGameError> {
        MeetingController::begin_discussion(world)?;
        let meeting = world
            .meeting()
            .cloned()
            .ok_or(DomainError::IllegalMeetingTransition {
                from: MeetingPhase::Idle.as_str(),
                to: MeetingPhase::InDiscussion.as_str(),
            })?;

        let order = speaking_order(world);
        let mut transcript = Transcript::new(round, meeting.summary());
        for pass in DISCUSSION_PASSES {
            for speaker in &order {
                let provider = provider_for(providers, speaker)?;
                let Some(view) = world.view_for(speaker) else {
                    continue;
                };
                let raw = self
                    .guarded(
                        speaker,
                        "speak",
                        provider.speak(&transcript, &view, round),
                        String::new(),
                    )
                    .await?;
                transcript.push(speaker, pass, &raw);
                if let Some(utterance) = transcript.utterances.last() {
                    self.logger.log(GameEvent::new(
                        "discussion",
                        json!({
                            "round": round,
                            "pass": pass,
                            "speaker": speaker,
                            "text": utterance.text,
                        }),
                    ));
                    progress.on_utterance(utterance);
                }
            }
        }

        MeetingController::open_vote(world)?;
        let candidates = VoteTally::candidates(world);
        let mut tally = VoteTally::new(round);
        for voter in world.active_ids() {
            let provider = provider_for(providers, &voter)?;
            let Some(view) = world.view_for(&voter) else {
                continue;
            };
            let choice = self
                .guarded(
                    &voter,
                    "vote",
                    provider.vote(&view, &candidates),
                    VoteTarget::Skip,
                )
                .await?;
            let ballot = tally.cast(world, &voter, choice.clone())?;
            if ballot.target != choice {
                warn!("{} voted for {}, not a candidate; counted as skip", voter, choice);
            }
            self.logger.log(GameEvent::new(
                "vote",
                json!({ "round": round, "voter": voter, "target": ballot.target.to_string() }),
            ));
        }

        let result = tally.tally();
        VoteTally::apply(world, &result)?;
        MeetingController::close(world)?;

        match result.outcome.ejected() {
            Some(ejected) => info!(
                "Round {}: {} ejected ({:.0}% agreement)",
                round,
                ejected,
                result.agreement.unwrap_or_default() * 100.0
            ),
            None => info!("Round {}: no one ejected", round),
        }
        let counts: Vec<_> = result
            .counts
            .iter()
            .map(|(target, votes)| json!({ "target": target.to_string(), "votes": votes }))
            .collect();
        self.logger.log(GameEvent::new(
            "vote_result",
            json!({
                "round": round,
                "counts": counts,
                "outcome": result.outcome,
                "agreement": result.agreement,
            }),
        ));
        progress.on_vote_result(&result);

        Ok(MeetingRecord {
            meeting,
            transcript,
            vote: result,
        })
    }

    // ==================== Provider Calls ====================

    /// Await a provider call under the decision timeout and cancellation
    /// token. Provider errors and timeouts yield `fallback`.
    async fn guarded<T, F>(
        &self,
        agent: &AgentId,
        decision: &'static str,
        call: F,
        fallback: T,
    ) -> Result<T, RunGameError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let timed = async {
            match self.params.decision_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, call).await {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout),
                },
                None => call.await,
            }
        };

        let result = if let Some(ref token) = self.cancellation_token {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(RunGameError::Cancelled),
                result = timed => result,
            }
        } else {
            timed.await
        };

        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("{} {} failed: {}; using default", agent, decision, e);
                Ok(fallback)
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), RunGameError> {
        match &self.cancellation_token {
            Some(token) if token.is_cancelled() => Err(RunGameError::Cancelled),
            _ => Ok(()),
        }
    }

    // ==================== Logging ====================

    fn log_game_started(&self, world: &WorldState, seed: u64) {
        let rules = world.rules();
        let agents: Vec<_> = world
            .agents()
            .iter()
            .map(|a| {
                json!({
                    "id": a.id(),
                    "faction": a.faction(),
                    "label": a.stats().label,
                    "start_room": a.location(),
                })
            })
            .collect();
        self.logger.log(GameEvent::new(
            "game_started",
            json!({
                "seed": seed,
                "round_budget": rules.round_budget,
                "ticks_per_round": rules.ticks_per_round,
                "meeting_room": rules.meeting_room,
                "agents": agents,
            }),
        ));
    }

    fn log_round_result(
        &self,
        world: &WorldState,
        record: &RoundRecord,
        result: Option<&GameOutcome>,
    ) {
        self.logger.log(GameEvent::new(
            "round_result",
            json!({
                "round": record.round,
                "ticks_played": record.ticks_played,
                "eliminations": record.eliminations,
                "meeting_called": world.meeting().is_some(),
                "ejected": record.meeting.as_ref().and_then(|m| m.vote.outcome.ejected()),
                "honest_remaining": world.alive_count(Faction::Honest),
                "adversarial_remaining": world.alive_count(Faction::Adversarial),
                "result": result,
            }),
        ));
    }
}

fn provider_for<'a>(
    providers: &'a Providers,
    id: &AgentId,
) -> Result<&'a Arc<dyn DecisionProvider>, RunGameError> {
    providers
        .get(id)
        .ok_or_else(|| RunGameError::MissingProvider(id.to_string()))
}
