//! Decision provider port
//!
//! Defines how the engine asks an agent's policy for decisions. Adapters
//! (rule-based bots, text-completion backends) live in the infrastructure
//! layer.

use async_trait::async_trait;
use crew_domain::{AgentId, Faction, ProposedAction, RoomId, Transcript, VoteTarget, WorldView};
use std::sync::Arc;
use thiserror::Error;

/// Errors a provider may return. The engine never propagates them: every
/// failure is replaced by a safe default for that decision.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid output: {0}")]
    InvalidOutput(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,
}

/// The policy driving one agent.
///
/// Every method receives the agent's own [`WorldView`]; providers never see
/// the full world.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Label recorded in the agent's stats (policy or model name).
    fn label(&self) -> &str;

    /// Movement phase: the action for the current tick.
    async fn choose_action(
        &self,
        view: &WorldView,
        round: u32,
    ) -> Result<ProposedAction, ProviderError>;

    /// Discussion phase: one utterance given the transcript so far.
    async fn speak(
        &self,
        transcript: &Transcript,
        view: &WorldView,
        round: u32,
    ) -> Result<String, ProviderError>;

    /// Voting phase: one target out of `candidates`.
    async fn vote(
        &self,
        view: &WorldView,
        candidates: &[VoteTarget],
    ) -> Result<VoteTarget, ProviderError>;

    /// Whether to report the unreported `bodies` lying in `room`.
    async fn decide_to_report(
        &self,
        bodies: &[AgentId],
        room: &RoomId,
        view: &WorldView,
        round: u32,
    ) -> Result<bool, ProviderError>;
}

/// Creates the provider for each seat once factions are assigned.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, id: &AgentId, faction: Faction) -> Arc<dyn DecisionProvider>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&AgentId, Faction) -> Arc<dyn DecisionProvider> + Send + Sync,
{
    fn create(&self, id: &AgentId, faction: Faction) -> Arc<dyn DecisionProvider> {
        self(id, faction)
    }
}
