//! Seeded rule-based decision provider
//!
//! Lets a game run without any text backend. Adversaries eliminate a lone
//! honest agent they share a room with. Honest agents report bodies and head
//! for the button once they have seen one. Votes go to the agent most
//! recently seen next to a body, otherwise the ballot is skipped.

use super::agent_seed;
use async_trait::async_trait;
use crew_application::{DecisionProvider, ProviderError, ProviderFactory};
use crew_domain::{
    ActionTag, AgentId, Faction, ProposedAction, RoomId, Transcript, VoteTarget, WorldView,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};

/// Chance of moving rather than staying when nothing else applies
const WANDER_CHANCE: f64 = 0.8;

/// Chance an unwitnessed adversary reports its own victim
const SELF_REPORT_CHANCE: f64 = 0.25;

pub struct HeuristicProvider {
    faction: Faction,
    rng: Mutex<ChaCha8Rng>,
}

impl HeuristicProvider {
    pub fn new(faction: Faction, seed: u64) -> Self {
        Self {
            faction,
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    fn wander(&self, view: &WorldView) -> ProposedAction {
        self.with_rng(|rng| {
            if !rng.gen_bool(WANDER_CHANCE) {
                return ProposedAction::Stay;
            }
            view.adjacent_rooms
                .choose(rng)
                .map(|r| ProposedAction::Move(r.room.clone()))
                .unwrap_or_default()
        })
    }

    fn head_for_button(&self, view: &WorldView) -> ProposedAction {
        if view.can_call_meeting() {
            ProposedAction::CallMeeting
        } else if view.can_move_to(&view.meeting_room) {
            ProposedAction::Move(view.meeting_room.clone())
        } else {
            self.wander(view)
        }
    }

    fn adversary_action(&self, view: &WorldView) -> ProposedAction {
        // An elimination last tick means the cooldown is still running
        if view.last_action != Some(ActionTag::Eliminate)
            && let Some(target) = lone_target(view)
        {
            return ProposedAction::Eliminate(target.clone());
        }
        self.wander(view)
    }

    fn honest_action(&self, view: &WorldView) -> ProposedAction {
        if let Some(body) = view.current_room.bodies.first() {
            return ProposedAction::Report(body.clone());
        }
        if seen_body_this_round(view) && !view.button_used {
            return self.head_for_button(view);
        }
        self.wander(view)
    }

    fn opening_line(&self, view: &WorldView) -> String {
        match (self.faction, suspect(view)) {
            (Faction::Honest, Some(suspect)) => {
                format!("I saw {} right next to a body. That is suspicious.", suspect)
            }
            (Faction::Honest, None) => match view.recent_perception.last() {
                Some(entry) if entry.agents_seen.is_empty() => {
                    format!("I was in {} on my own, nothing to report.", entry.room)
                }
                Some(entry) => format!(
                    "I was in {} with {}.",
                    entry.room,
                    join_ids(&entry.agents_seen)
                ),
                None => "I have not seen anything yet.".to_string(),
            },
            (Faction::Adversarial, _) => {
                let alibi = self.with_rng(|rng| {
                    view.adjacent_rooms
                        .choose(rng)
                        .map(|r| r.room.clone())
                        .unwrap_or_else(|| view.location().clone())
                });
                format!("I was in {} the whole time and saw no one.", alibi)
            }
        }
    }

    fn rebuttal_line(&self, view: &WorldView) -> String {
        match self.faction {
            Faction::Honest => match suspect(view) {
                Some(suspect) => format!("I still think we should look hard at {}.", suspect),
                None => "I have nothing to add.".to_string(),
            },
            Faction::Adversarial => {
                let scapegoat = self.with_rng(|rng| {
                    let strangers: Vec<&AgentId> = view
                        .vote_candidates()
                        .filter(|a| !view.is_teammate(a))
                        .collect();
                    strangers.choose(rng).map(|a| (*a).clone())
                });
                match scapegoat {
                    Some(agent) => format!("{} has been very quiet. I do not trust them.", agent),
                    None => "Let us not rush this vote.".to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl DecisionProvider for HeuristicProvider {
    fn label(&self) -> &str {
        "heuristic"
    }

    async fn choose_action(
        &self,
        view: &WorldView,
        _round: u32,
    ) -> Result<ProposedAction, ProviderError> {
        Ok(match self.faction {
            Faction::Adversarial => self.adversary_action(view),
            Faction::Honest => self.honest_action(view),
        })
    }

    async fn speak(
        &self,
        transcript: &Transcript,
        view: &WorldView,
        _round: u32,
    ) -> Result<String, ProviderError> {
        let spoken = transcript
            .utterances
            .iter()
            .any(|u| u.speaker == view.id);
        Ok(if spoken {
            self.rebuttal_line(view)
        } else {
            self.opening_line(view)
        })
    }

    async fn vote(
        &self,
        view: &WorldView,
        candidates: &[VoteTarget],
    ) -> Result<VoteTarget, ProviderError> {
        Ok(suspect(view)
            .map(VoteTarget::Agent)
            .filter(|target| candidates.contains(target))
            .unwrap_or(VoteTarget::Skip))
    }

    async fn decide_to_report(
        &self,
        _bodies: &[AgentId],
        _room: &RoomId,
        view: &WorldView,
        _round: u32,
    ) -> Result<bool, ProviderError> {
        Ok(match self.faction {
            Faction::Honest => true,
            Faction::Adversarial => {
                let witnessed = view
                    .current_room
                    .occupants
                    .iter()
                    .any(|o| !view.is_teammate(o));
                witnessed || self.with_rng(|rng| rng.gen_bool(SELF_REPORT_CHANCE))
            }
        })
    }
}

/// Creates one [`HeuristicProvider`] per agent, seeded from the game seed.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicFactory {
    seed: u64,
}

impl HeuristicFactory {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl ProviderFactory for HeuristicFactory {
    fn create(&self, id: &AgentId, faction: Faction) -> Arc<dyn DecisionProvider> {
        Arc::new(HeuristicProvider::new(faction, agent_seed(self.seed, id)))
    }
}

/// The only non-teammate in the room, if there is exactly one.
fn lone_target(view: &WorldView) -> Option<&AgentId> {
    let strangers: Vec<&AgentId> = view
        .current_room
        .occupants
        .iter()
        .filter(|o| !view.is_teammate(o))
        .collect();
    match strangers.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

fn seen_body_this_round(view: &WorldView) -> bool {
    view.recent_perception
        .iter()
        .any(|e| e.round == view.round && !e.bodies_seen.is_empty())
}

/// Most recent active agent seen in a room with a body.
fn suspect(view: &WorldView) -> Option<AgentId> {
    view.recent_perception
        .iter()
        .rev()
        .filter(|e| !e.bodies_seen.is_empty())
        .flat_map(|e| e.agents_seen.iter())
        .find(|a| **a != view.id && !view.is_teammate(a) && view.active_agents.contains(a))
        .cloned()
}

fn join_ids(ids: &[AgentId]) -> String {
    ids.iter()
        .map(AgentId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_domain::{AgentSpec, GameRules, PerceptionEntry, RoomGraph, WorldState};

    fn world(specs: &[(&str, Faction, &str)]) -> WorldState {
        let roster = specs
            .iter()
            .map(|(id, faction, room)| AgentSpec::new(*id, *faction, *room))
            .collect();
        WorldState::new(RoomGraph::station(), GameRules::default(), roster).unwrap()
    }

    fn base_world() -> WorldState {
        world(&[
            ("Agent_0", Faction::Honest, "Admin"),
            ("Agent_1", Faction::Honest, "Cafeteria"),
            ("Agent_2", Faction::Honest, "Cafeteria"),
            ("Agent_3", Faction::Adversarial, "Admin"),
            ("Agent_4", Faction::Honest, "Reactor"),
        ])
    }

    fn view(world: &WorldState, id: &str) -> WorldView {
        world.view_for(&id.into()).unwrap()
    }

    #[tokio::test]
    async fn test_adversary_eliminates_lone_target() {
        let world = base_world();
        let bot = HeuristicProvider::new(Faction::Adversarial, 1);
        let action = bot.choose_action(&view(&world, "Agent_3"), 1).await.unwrap();
        assert_eq!(action, ProposedAction::Eliminate("Agent_0".into()));
    }

    #[tokio::test]
    async fn test_adversary_holds_off_with_witnesses() {
        let world = world(&[
            ("Agent_0", Faction::Honest, "Admin"),
            ("Agent_1", Faction::Honest, "Admin"),
            ("Agent_2", Faction::Honest, "Cafeteria"),
            ("Agent_3", Faction::Adversarial, "Admin"),
        ]);
        let bot = HeuristicProvider::new(Faction::Adversarial, 1);
        for _ in 0..10 {
            let action = bot.choose_action(&view(&world, "Agent_3"), 1).await.unwrap();
            assert_ne!(action.tag(), ActionTag::Eliminate);
        }
    }

    #[tokio::test]
    async fn test_adversary_respects_cooldown() {
        let world = base_world();
        let mut view = view(&world, "Agent_3");
        view.last_action = Some(ActionTag::Eliminate);
        let bot = HeuristicProvider::new(Faction::Adversarial, 1);
        let action = bot.choose_action(&view, 1).await.unwrap();
        assert_ne!(action.tag(), ActionTag::Eliminate);
    }

    #[tokio::test]
    async fn test_honest_reports_body_in_room() {
        let mut world = base_world();
        world.eliminate(&"Agent_0".into(), &"Agent_3".into()).unwrap();
        world.move_agent(&"Agent_1".into(), &"Admin".into()).unwrap();

        let bot = HeuristicProvider::new(Faction::Honest, 1);
        let view = view(&world, "Agent_1");
        assert_eq!(
            bot.choose_action(&view, 1).await.unwrap(),
            ProposedAction::Report("Agent_0".into())
        );
        assert!(
            bot.decide_to_report(&["Agent_0".into()], &"Admin".into(), &view, 1)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_honest_presses_button_after_seeing_body() {
        let world = base_world();
        let mut view = view(&world, "Agent_1");
        view.recent_perception = vec![PerceptionEntry {
            round: view.round,
            tick: 1,
            room: "Admin".into(),
            agents_seen: vec!["Agent_3".into()],
            bodies_seen: vec!["Agent_0".into()],
        }];
        let bot = HeuristicProvider::new(Faction::Honest, 1);
        assert_eq!(
            bot.choose_action(&view, 1).await.unwrap(),
            ProposedAction::CallMeeting
        );
    }

    #[tokio::test]
    async fn test_vote_for_agent_seen_near_body() {
        let world = base_world();
        let mut view = view(&world, "Agent_1");
        let candidates: Vec<VoteTarget> = view
            .active_agents
            .iter()
            .cloned()
            .map(VoteTarget::Agent)
            .chain([VoteTarget::Skip])
            .collect();

        let bot = HeuristicProvider::new(Faction::Honest, 1);
        assert_eq!(bot.vote(&view, &candidates).await.unwrap(), VoteTarget::Skip);

        view.recent_perception = vec![PerceptionEntry {
            round: 1,
            tick: 2,
            room: "Admin".into(),
            agents_seen: vec!["Agent_3".into()],
            bodies_seen: vec!["Agent_0".into()],
        }];
        assert_eq!(
            bot.vote(&view, &candidates).await.unwrap(),
            VoteTarget::Agent("Agent_3".into())
        );
    }

    #[tokio::test]
    async fn test_same_seed_same_choices() {
        let world = base_world();
        let view = view(&world, "Agent_4");
        let a = HeuristicProvider::new(Faction::Honest, 77);
        let b = HeuristicProvider::new(Faction::Honest, 77);
        for _ in 0..20 {
            assert_eq!(
                a.choose_action(&view, 1).await.unwrap(),
                b.choose_action(&view, 1).await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_speaks_opening_then_rebuttal() {
        let world = base_world();
        let view = view(&world, "Agent_2");
        let bot = HeuristicProvider::new(Faction::Honest, 1);

        let mut transcript = Transcript::new(1, "Meeting called");
        let opening = bot.speak(&transcript, &view, 1).await.unwrap();
        assert_eq!(opening, "I have not seen anything yet.");

        transcript.push(&view.id, crew_domain::DiscussionPass::Opening, &opening);
        let rebuttal = bot.speak(&transcript, &view, 1).await.unwrap();
        assert_eq!(rebuttal, "I have nothing to add.");
    }

    #[test]
    fn test_factory_labels_providers() {
        let factory = HeuristicFactory::new(3);
        let provider = factory.create(&"Agent_0".into(), Faction::Honest);
        assert_eq!(provider.label(), "heuristic");
    }
}
