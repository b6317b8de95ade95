//! Win condition evaluation

use crate::agent::Faction;
use crate::world::WorldState;
use serde::{Deserialize, Serialize};

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    /// No adversary is left in play
    AdversariesRemoved,
    /// Adversaries reached parity with honest agents
    Parity,
    /// The round budget ran out
    RoundBudgetExhausted,
}

impl WinReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinReason::AdversariesRemoved => "all adversaries removed",
            WinReason::Parity => "adversaries reached parity",
            WinReason::RoundBudgetExhausted => "round budget exhausted",
        }
    }
}

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Faction,
    pub reason: WinReason,
    /// Round in which the result was reached
    pub round: u32,
    pub honest_remaining: usize,
    pub adversarial_remaining: usize,
}

/// Evaluate the win conditions for `round`.
///
/// Pass `budget + 1` after the last round to get the budget-exhaustion
/// result.
pub fn evaluate(world: &WorldState, round: u32) -> Option<GameOutcome> {
    let honest = world.alive_count(Faction::Honest);
    let adversarial = world.alive_count(Faction::Adversarial);

    let (winner, reason) = if adversarial == 0 {
        (Faction::Honest, WinReason::AdversariesRemoved)
    } else if adversarial >= honest {
        (Faction::Adversarial, WinReason::Parity)
    } else if round > world.rules().round_budget {
        (Faction::Honest, WinReason::RoundBudgetExhausted)
    } else {
        return None;
    };

    Some(GameOutcome {
        winner,
        reason,
        round,
        honest_remaining: honest,
        adversarial_remaining: adversarial,
    })
}

/// Result after the last round has been played.
pub fn evaluate_final(world: &WorldState) -> GameOutcome {
    let round = world.rules().round_budget + 1;
    evaluate(world, round).unwrap_or(GameOutcome {
        winner: Faction::Honest,
        reason: WinReason::RoundBudgetExhausted,
        round,
        honest_remaining: world.alive_count(Faction::Honest),
        adversarial_remaining: world.alive_count(Faction::Adversarial),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{honest, line_world};

    #[test]
    fn test_running_game_has_no_result() {
        let world = line_world(&[honest("Agent_0", "A"), honest("Agent_1", "A")]);
        assert_eq!(evaluate(&world, 1), None);
    }

    #[test]
    fn test_parity_after_elimination() {
        let mut world = line_world(&[
            honest("Agent_0", "D"),
            honest("Agent_1", "D"),
            crate::test_support::adversary("Agent_7", "D"),
        ]);
        assert_eq!(evaluate(&world, 1), None);
        world.eliminate(&"Agent_0".into(), &"Agent_9".into()).unwrap();

        let outcome = evaluate(&world, 1).unwrap();
        assert_eq!(outcome.winner, Faction::Adversarial);
        assert_eq!(outcome.reason, WinReason::Parity);
        assert_eq!((outcome.honest_remaining, outcome.adversarial_remaining), (2, 2));
    }

    #[test]
    fn test_all_adversaries_ejected() {
        let mut world = line_world(&[honest("Agent_0", "A"), honest("Agent_1", "A")]);
        world.eject(&"Agent_9".into()).unwrap();
        let outcome = evaluate(&world, 2).unwrap();
        assert_eq!(outcome.winner, Faction::Honest);
        assert_eq!(outcome.reason, WinReason::AdversariesRemoved);
    }

    #[test]
    fn test_budget_exhaustion_is_honest_win() {
        let world = line_world(&[
            honest("Agent_0", "A"),
            honest("Agent_1", "A"),
        ]);
        let budget = world.rules().round_budget;
        assert_eq!(evaluate(&world, budget), None);
        let outcome = evaluate(&world, budget + 1).unwrap();
        assert_eq!(outcome.winner, Faction::Honest);
        assert_eq!(outcome.reason, WinReason::RoundBudgetExhausted);
        assert_eq!((outcome.honest_remaining, outcome.adversarial_remaining), (3, 1));
        assert_eq!(evaluate_final(&world), outcome);
    }

    #[test]
    fn test_result_holds_once_reached() {
        let mut world = line_world(&[
            honest("Agent_0", "D"),
            honest("Agent_1", "D"),
            crate::test_support::adversary("Agent_7", "D"),
        ]);
        world.eliminate(&"Agent_0".into(), &"Agent_9".into()).unwrap();
        assert!(evaluate(&world, 1).is_some());
        world.eliminate(&"Agent_1".into(), &"Agent_9".into()).unwrap();
        assert_eq!(evaluate(&world, 1).unwrap().winner, Faction::Adversarial);
    }
}
