//! Per-faction routing of agents to decision providers.

use super::command::CommandGenerator;
use super::heuristic::HeuristicFactory;
use super::text::{ReplyParser, TextDecisionProvider, TextGenerator};
use crate::config::{FileProvidersConfig, ProviderKind};
use crew_application::{DecisionProvider, ProviderFactory};
use crew_domain::{AgentId, Faction};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderSetupError {
    #[error("providers.command is required for the command provider")]
    MissingCommand,

    #[error("Failed to compile reply patterns: {0}")]
    Patterns(#[from] regex::Error),
}

struct TextBackend {
    generator: Arc<dyn TextGenerator>,
    parser: Arc<ReplyParser>,
}

/// Factory that picks the provider kind from the agent's faction.
///
/// Heuristic agents are seeded from the game seed; text agents share one
/// backend and one compiled parser.
pub struct RoutingFactory {
    config: FileProvidersConfig,
    heuristic: HeuristicFactory,
    text: Option<TextBackend>,
}

impl RoutingFactory {
    pub fn from_config(config: &FileProvidersConfig, seed: u64) -> Result<Self, ProviderSetupError> {
        let text = if config.uses_command() {
            let command = config.command().ok_or(ProviderSetupError::MissingCommand)?;
            Some(TextBackend {
                generator: Arc::new(CommandGenerator::new(command)),
                parser: Arc::new(ReplyParser::new()?),
            })
        } else {
            None
        };

        Ok(Self {
            config: config.clone(),
            heuristic: HeuristicFactory::new(seed),
            text,
        })
    }

    /// Route every text-driven agent to `generator` instead of a command.
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Result<Self, ProviderSetupError> {
        self.text = Some(TextBackend {
            generator,
            parser: Arc::new(ReplyParser::new()?),
        });
        Ok(self)
    }
}

impl ProviderFactory for RoutingFactory {
    fn create(&self, id: &AgentId, faction: Faction) -> Arc<dyn DecisionProvider> {
        match (self.config.kind_for(faction), &self.text) {
            (ProviderKind::Command, Some(text)) => Arc::new(TextDecisionProvider::new(
                text.generator.clone(),
                text.parser.clone(),
            )),
            _ => self.heuristic.create(id, faction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes_to_heuristic() {
        let factory = RoutingFactory::from_config(&FileProvidersConfig::default(), 1).unwrap();
        let provider = factory.create(&"Agent_0".into(), Faction::Honest);
        assert_eq!(provider.label(), "heuristic");
    }

    #[test]
    fn test_command_routing_per_faction() {
        let config = FileProvidersConfig {
            kind: ProviderKind::Command,
            command: Some("cat".to_string()),
            adversarial_kind: Some(ProviderKind::Heuristic),
        };
        let factory = RoutingFactory::from_config(&config, 1).unwrap();
        assert_eq!(
            factory.create(&"Agent_0".into(), Faction::Honest).label(),
            "command"
        );
        assert_eq!(
            factory.create(&"Agent_1".into(), Faction::Adversarial).label(),
            "heuristic"
        );
    }

    #[test]
    fn test_command_kind_requires_command() {
        let config = FileProvidersConfig {
            kind: ProviderKind::Command,
            command: Some("   ".to_string()),
            adversarial_kind: None,
        };
        assert!(matches!(
            RoutingFactory::from_config(&config, 1),
            Err(ProviderSetupError::MissingCommand)
        ));
    }
}
