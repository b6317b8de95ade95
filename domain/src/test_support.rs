//! Shared fixtures for domain unit tests.

use crate::agent::{AgentSpec, Faction};
use crate::core::rules::GameRules;
use crate::map::RoomGraph;
use crate::world::WorldState;

/// A - B - C - D, with A as the meeting room.
pub(crate) fn line_graph() -> RoomGraph {
    RoomGraph::new([
        ("A", vec!["B"]),
        ("B", vec!["A", "C"]),
        ("C", vec!["B", "D"]),
        ("D", vec!["C"]),
    ])
    .unwrap()
}

pub(crate) fn line_rules() -> GameRules {
    GameRules::default()
        .with_meeting_room("A")
        .with_round_budget(3)
        .with_ticks_per_round(4)
}

pub(crate) fn honest(id: &str, room: &str) -> AgentSpec {
    AgentSpec::new(id, Faction::Honest, room)
}

pub(crate) fn adversary(id: &str, room: &str) -> AgentSpec {
    AgentSpec::new(id, Faction::Adversarial, room)
}

/// World on the line map with the given agents, padded with an honest
/// `Agent_8` and an adversarial `Agent_9`, both in room D, unless the roster
/// already names them.
pub(crate) fn line_world(specs: &[AgentSpec]) -> WorldState {
    let mut roster = specs.to_vec();
    for filler in [honest("Agent_8", "D"), adversary("Agent_9", "D")] {
        if roster.iter().all(|s| s.id != filler.id) {
            roster.push(filler);
        }
    }
    WorldState::new(line_graph(), line_rules(), roster).unwrap()
}
