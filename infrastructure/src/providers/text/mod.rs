//! Decision provider over a free-form text backend.
//!
//! [`TextDecisionProvider`] renders each decision as a prompt, hands it to a
//! [`TextGenerator`] and parses the reply. Replies that do not parse become
//! [`ProviderError::InvalidOutput`], which the scheduler replaces with the
//! safe default.

mod parse;
mod prompt;

pub use parse::ReplyParser;

use async_trait::async_trait;
use crew_application::{DecisionProvider, ProviderError};
use crew_domain::{AgentId, ProposedAction, RoomId, Transcript, VoteTarget, WorldView};
use std::sync::Arc;
use tracing::debug;

/// A backend that completes a prompt with free-form text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name used as the agent's label
    fn name(&self) -> &str;

    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;
}

pub struct TextDecisionProvider {
    generator: Arc<dyn TextGenerator>,
    parser: Arc<ReplyParser>,
}

impl TextDecisionProvider {
    pub fn new(generator: Arc<dyn TextGenerator>, parser: Arc<ReplyParser>) -> Self {
        Self { generator, parser }
    }

    async fn ask(&self, view: &WorldView, prompt: &str) -> Result<String, ProviderError> {
        let system = prompt::system_prompt(view);
        let reply = self.generator.generate(&system, prompt).await?;
        debug!("{} replied: {}", view.id, reply.trim());
        Ok(reply)
    }
}

fn invalid(reply: &str) -> ProviderError {
    ProviderError::InvalidOutput(reply.trim().chars().take(120).collect())
}

#[async_trait]
impl DecisionProvider for TextDecisionProvider {
    fn label(&self) -> &str {
        self.generator.name()
    }

    async fn choose_action(
        &self,
        view: &WorldView,
        round: u32,
    ) -> Result<ProposedAction, ProviderError> {
        let reply = self.ask(view, &prompt::action_prompt(view, round)).await?;
        self.parser
            .action(&reply, view)
            .ok_or_else(|| invalid(&reply))
    }

    async fn speak(
        &self,
        transcript: &Transcript,
        view: &WorldView,
        round: u32,
    ) -> Result<String, ProviderError> {
        self.ask(view, &prompt::speak_prompt(view, transcript, round))
            .await
    }

    async fn vote(
        &self,
        view: &WorldView,
        candidates: &[VoteTarget],
    ) -> Result<VoteTarget, ProviderError> {
        let reply = self
            .ask(view, &prompt::vote_prompt(view, candidates, view.round))
            .await?;
        self.parser
            .vote(&reply, candidates)
            .ok_or_else(|| invalid(&reply))
    }

    async fn decide_to_report(
        &self,
        bodies: &[AgentId],
        room: &RoomId,
        view: &WorldView,
        _round: u32,
    ) -> Result<bool, ProviderError> {
        let reply = self
            .ask(view, &prompt::report_prompt(view, bodies, room))
            .await?;
        self.parser.yes_no(&reply).ok_or_else(|| invalid(&reply))
    }
}
