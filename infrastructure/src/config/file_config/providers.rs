//! Decision provider configuration from TOML (`[providers]` section)
//!
//! ```toml
//! [providers]
//! kind = "command"
//! command = "ollama run llama3"
//! adversarial_kind = "heuristic"
//! ```

use crew_domain::Faction;
use serde::{Deserialize, Serialize};

/// Which decision provider drives an agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Seeded rule-based bot
    #[default]
    Heuristic,
    /// Free-form text from a local command (prompt on stdin, reply on stdout)
    Command,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Heuristic => "heuristic",
            ProviderKind::Command => "command",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heuristic" | "bot" => Ok(ProviderKind::Heuristic),
            "command" | "cmd" => Ok(ProviderKind::Command),
            _ => Err(format!("unknown provider kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw provider configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub kind: ProviderKind,
    /// Shell command for the `command` provider
    pub command: Option<String>,
    /// Override for adversarial agents
    pub adversarial_kind: Option<ProviderKind>,
}

impl FileProvidersConfig {
    /// Provider kind for an agent of `faction`
    pub fn kind_for(&self, faction: Faction) -> ProviderKind {
        match faction {
            Faction::Adversarial => self.adversarial_kind.unwrap_or(self.kind),
            Faction::Honest => self.kind,
        }
    }

    pub fn uses_command(&self) -> bool {
        self.kind == ProviderKind::Command
            || self.adversarial_kind == Some(ProviderKind::Command)
    }

    /// Configured command, if non-blank
    pub fn command(&self) -> Option<&str> {
        self.command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
