//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain types once
//! validated.

mod game;
mod map;
mod output;
mod providers;

pub use game::FileGameConfig;
pub use map::FileMapConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use providers::{FileProvidersConfig, ProviderKind};

use crew_domain::{DomainError, GameRules, RoomGraph};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("decision_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("providers.command is required when a command provider is selected")]
    MissingCommand,

    #[error("meeting room {0} is not on the map")]
    MeetingRoomNotOnMap(String),

    #[error(transparent)]
    Game(#[from] DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Rules and budgets
    pub game: FileGameConfig,
    /// Room graph
    pub map: FileMapConfig,
    /// Decision providers
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.to_game().map(|_| ())
    }

    /// Validated rules and room graph
    pub fn to_game(&self) -> Result<(GameRules, RoomGraph), ConfigValidationError> {
        if let Some(0) = self.game.decision_timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.providers.uses_command() && self.providers.command().is_none() {
            return Err(ConfigValidationError::MissingCommand);
        }

        let rules = self.game.to_rules();
        rules.validate()?;
        let graph = self.map.to_graph()?;
        if !graph.contains(&rules.meeting_room) {
            return Err(ConfigValidationError::MeetingRoomNotOnMap(
                rules.meeting_room.to_string(),
            ));
        }
        Ok((rules, graph))
    }

    /// Render as TOML (for `--show-config`)
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[game]
rounds = 7
ticks_per_round = 3
honest = 5
adversarial = 1
meeting_room = "Admin"
seed = 9

[providers]
kind = "heuristic"

[output]
format = "text"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let (rules, graph) = config.to_game().unwrap();
        assert_eq!(rules.round_budget, 7);
        assert_eq!(rules.ticks_per_round, 3);
        assert_eq!(rules.total_agents(), 6);
        assert_eq!(rules.meeting_room.as_str(), "Admin");
        assert_eq!(config.game.seed, Some(9));
        assert_eq!(graph, RoomGraph::station());
        assert!(!config.output.color);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.game.seed.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_zero_timeout() {
        let toml_str = r#"
[game]
decision_timeout_seconds = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_validate_command_without_command_line() {
        let toml_str = r#"
[providers]
kind = "command"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingCommand)
        ));
    }

    #[test]
    fn test_validate_parity_roster() {
        let toml_str = r#"
[game]
honest = 2
adversarial = 2
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::Game(
                DomainError::AdversariesAtParity { .. }
            ))
        ));
    }

    #[test]
    fn test_validate_meeting_room_missing() {
        let toml_str = r#"
[game]
meeting_room = "Bridge"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MeetingRoomNotOnMap(room)) if room == "Bridge"
        ));
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = FileConfig::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[game]"));
        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
