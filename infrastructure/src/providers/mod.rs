//! Decision providers
//!
//! - [`HeuristicProvider`]: seeded rule-based bot, needs no backend
//! - [`TextDecisionProvider`]: prompts a [`TextGenerator`] and parses replies
//! - [`CommandGenerator`]: text backend running a local command
//! - [`RoutingFactory`]: picks one of the above per faction from config

mod command;
mod heuristic;
mod routing;
mod text;

pub use command::CommandGenerator;
pub use heuristic::{HeuristicFactory, HeuristicProvider};
pub use routing::{ProviderSetupError, RoutingFactory};
pub use text::{ReplyParser, TextDecisionProvider, TextGenerator};

use crew_domain::AgentId;

/// Per-agent seed derived from the game seed and the agent id.
pub(crate) fn agent_seed(seed: u64, id: &AgentId) -> u64 {
    id.as_str()
        .bytes()
        .fold(seed ^ 0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_seed_differs_per_agent() {
        let a = agent_seed(7, &"Agent_0".into());
        let b = agent_seed(7, &"Agent_1".into());
        assert_ne!(a, b);
        assert_eq!(a, agent_seed(7, &"Agent_0".into()));
        assert_ne!(a, agent_seed(8, &"Agent_0".into()));
    }
}
