//! Game configuration from TOML (`[game]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [game]
//! rounds = 10
//! ticks_per_round = 4
//! honest = 8
//! adversarial = 2
//! meeting_room = "Cafeteria"
//! perception_window = 3
//! seed = 42
//! decision_timeout_seconds = 60
//! ```

use crew_application::DEFAULT_DECISION_TIMEOUT;
use crew_domain::GameRules;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw game configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGameConfig {
    /// Number of rounds before the honest faction wins by default
    pub rounds: u32,
    /// Movement ticks per round
    pub ticks_per_round: u32,
    pub honest: usize,
    pub adversarial: usize,
    /// Room holding the emergency button
    pub meeting_room: String,
    /// Perception entries each agent keeps
    pub perception_window: usize,
    /// Seed for roster and heuristic bots; random when unset
    pub seed: Option<u64>,
    /// Per-decision timeout in seconds
    pub decision_timeout_seconds: Option<u64>,
}

impl Default for FileGameConfig {
    fn default() -> Self {
        let rules = GameRules::default();
        Self {
            rounds: rules.round_budget,
            ticks_per_round: rules.ticks_per_round,
            honest: rules.honest_count,
            adversarial: rules.adversarial_count,
            meeting_room: rules.meeting_room.to_string(),
            perception_window: rules.perception_window,
            seed: None,
            decision_timeout_seconds: None,
        }
    }
}

impl FileGameConfig {
    /// Convert into domain rules (not yet validated)
    pub fn to_rules(&self) -> GameRules {
        GameRules::default()
            .with_round_budget(self.rounds)
            .with_ticks_per_round(self.ticks_per_round)
            .with_roster(self.honest, self.adversarial)
            .with_meeting_room(self.meeting_room.as_str())
            .with_perception_window(self.perception_window)
    }

    pub fn decision_timeout(&self) -> Duration {
        self.decision_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DECISION_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_default_matches_rules() {
        let config = FileGameConfig::default();
        assert_eq!(config.to_rules(), GameRules::default());
        assert_eq!(config.decision_timeout(), DEFAULT_DECISION_TIMEOUT);
    }

    #[test]
    fn test_game_config_partial_override() {
        let toml_str = r#"
[game]
rounds = 5
adversarial = 1
decision_timeout_seconds = 10
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let rules = config.game.to_rules();
        assert_eq!(rules.round_budget, 5);
        assert_eq!(rules.adversarial_count, 1);
        assert_eq!(rules.honest_count, 8);
        assert_eq!(config.game.decision_timeout(), Duration::from_secs(10));
    }
}
