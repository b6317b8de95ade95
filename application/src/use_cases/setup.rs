//! Seeded game setup
//!
//! Assigns factions and start rooms from a single seed so that a game with
//! deterministic providers can be replayed exactly.

use crew_domain::{AgentId, AgentSpec, Faction, GameRules, RoomGraph, RoomId};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Build a roster of `Agent_0..Agent_n` with shuffled factions and random
/// start rooms.
pub fn seeded_roster(rules: &GameRules, graph: &RoomGraph, seed: u64) -> Vec<AgentSpec> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut factions: Vec<Faction> = std::iter::repeat_n(Faction::Honest, rules.honest_count)
        .chain(std::iter::repeat_n(Faction::Adversarial, rules.adversarial_count))
        .collect();
    factions.shuffle(&mut rng);

    let rooms: Vec<&RoomId> = graph.rooms().collect();
    factions
        .into_iter()
        .enumerate()
        .map(|(i, faction)| {
            let room = rooms
                .choose(&mut rng)
                .map(|r| (*r).clone())
                .unwrap_or_else(|| rules.meeting_room.clone());
            AgentSpec::new(AgentId::numbered(i), faction, room)
        })
        .collect()
}
