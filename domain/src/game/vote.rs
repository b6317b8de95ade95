//! Ballot collection and tallying

use crate::agent::{AgentId, Faction};
use crate::core::error::DomainError;
use crate::world::WorldState;
use serde::{Deserialize, Serialize};

/// What a ballot is cast for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteTarget {
    Agent(AgentId),
    Skip,
}

impl VoteTarget {
    pub fn agent(&self) -> Option<&AgentId> {
        match self {
            VoteTarget::Agent(id) => Some(id),
            VoteTarget::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, VoteTarget::Skip)
    }
}

impl std::fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteTarget::Agent(id) => write!(f, "{}", id),
            VoteTarget::Skip => write!(f, "SKIP"),
        }
    }
}

impl From<AgentId> for VoteTarget {
    fn from(id: AgentId) -> Self {
        VoteTarget::Agent(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub voter: AgentId,
    pub target: VoteTarget,
    pub round: u32,
}

/// Result of a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VoteOutcome {
    Ejected { target: AgentId, votes: u32 },
    /// The two highest counts are equal
    Tie { votes: u32 },
    /// Skip received strictly the most votes
    Skipped,
    NoVotes,
}

impl VoteOutcome {
    pub fn ejected(&self) -> Option<&AgentId> {
        match self {
            VoteOutcome::Ejected { target, .. } => Some(target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteResult {
    pub round: u32,
    pub ballots: Vec<Ballot>,
    /// Counts per target, highest first; ties keep first-vote order
    pub counts: Vec<(VoteTarget, u32)>,
    pub outcome: VoteOutcome,
    /// Share of all ballots that went to the ejected agent
    pub agreement: Option<f64>,
}

/// Ballot box for one meeting.
#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    round: u32,
    ballots: Vec<Ballot>,
}

impl VoteTally {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            ballots: Vec::new(),
        }
    }

    /// Every valid choice: active agents in registry order, then Skip.
    pub fn candidates(world: &WorldState) -> Vec<VoteTarget> {
        world
            .active_agents()
            .map(|a| VoteTarget::Agent(a.id().clone()))
            .chain(std::iter::once(VoteTarget::Skip))
            .collect()
    }

    /// Map a target outside the candidate set to Skip.
    pub fn coerce(world: &WorldState, target: VoteTarget) -> VoteTarget {
        match target {
            VoteTarget::Agent(id) if world.is_active(&id) => VoteTarget::Agent(id),
            _ => VoteTarget::Skip,
        }
    }

    /// Cast a ballot for an active voter that has not voted yet.
    ///
    /// Returns the stored ballot, whose target may have been coerced to Skip.
    pub fn cast(
        &mut self,
        world: &WorldState,
        voter: &AgentId,
        target: VoteTarget,
    ) -> Result<&Ballot, DomainError> {
        if !world.is_active(voter) {
            return Err(DomainError::AgentNotActive(voter.to_string()));
        }
        if self.ballots.iter().any(|b| &b.voter == voter) {
            return Err(DomainError::DuplicateAgent(voter.to_string()));
        }
        self.ballots.push(Ballot {
            voter: voter.clone(),
            target: Self::coerce(world, target),
            round: self.round,
        });
        Ok(&self.ballots[self.ballots.len() - 1])
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    /// Count the ballots.
    ///
    /// A real target is ejected only with strictly more votes than every
    /// other entry, Skip included.
    pub fn tally(&self) -> VoteResult {
        let mut counts: Vec<(VoteTarget, u32)> = Vec::new();
        for ballot in &self.ballots {
            match counts.iter_mut().find(|(t, _)| t == &ballot.target) {
                Some((_, n)) => *n += 1,
                None => counts.push((ballot.target.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let outcome = match counts.as_slice() {
            [] => VoteOutcome::NoVotes,
            [(_, a), (_, b), ..] if a == b => VoteOutcome::Tie { votes: *a },
            [(VoteTarget::Skip, _), ..] => VoteOutcome::Skipped,
            [(VoteTarget::Agent(target), votes), ..] => VoteOutcome::Ejected {
                target: target.clone(),
                votes: *votes,
            },
        };

        let agreement = match &outcome {
            VoteOutcome::Ejected { votes, .. } => {
                Some(f64::from(*votes) / self.ballots.len() as f64)
            }
            _ => None,
        };

        VoteResult {
            round: self.round,
            ballots: self.ballots.clone(),
            counts,
            outcome,
            agreement,
        }
    }

    /// Apply a result: update every voter's stats, credit votes received and
    /// eject the winner.
    pub fn apply(world: &mut WorldState, result: &VoteResult) -> Result<(), DomainError> {
        for ballot in &result.ballots {
            let target_faction: Option<Faction> = ballot
                .target
                .agent()
                .and_then(|id| world.agent(id))
                .map(|a| a.faction());

            let voter = world.agent_mut(&ballot.voter)?;
            voter.stats.votes_cast += 1;
            match target_faction {
                None => voter.stats.skipped_votes += 1,
                Some(target) if voter.faction().is_correct_vote(target) => {
                    voter.stats.correct_votes += 1
                }
                Some(_) => voter.stats.incorrect_votes += 1,
            }

            if let Some(target) = ballot.target.agent() {
                world.agent_mut(target)?.stats.votes_received += 1;
            }
        }

        if let Some(target) = result.outcome.ejected() {
            world.eject(target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentStatus;
    use crate::test_support::{honest, line_world};

    fn vote(world: &WorldState, votes: &[(&str, Option<&str>)]) -> VoteTally {
        let mut tally = VoteTally::new(1);
        for (voter, target) in votes {
            let target = match target {
                Some(t) => VoteTarget::Agent(AgentId::new(*t)),
                None => VoteTarget::Skip,
            };
            tally.cast(world, &AgentId::new(*voter), target).unwrap();
        }
        tally
    }

    fn small_world() -> WorldState {
        line_world(&[
            honest("Agent_0", "A"),
            honest("Agent_1", "A"),
            honest("Agent_2", "A"),
            honest("Agent_3", "A"),
        ])
    }

    #[test]
    fn test_plurality_with_skip_ejects() {
        let mut world = small_world();
        let tally = vote(
            &world,
            &[
                ("Agent_0", Some("Agent_1")),
                ("Agent_2", Some("Agent_1")),
                ("Agent_3", None),
            ],
        );
        let result = tally.tally();
        assert_eq!(
            result.outcome,
            VoteOutcome::Ejected {
                target: "Agent_1".into(),
                votes: 2
            }
        );
        let agreement = result.agreement.unwrap();
        assert!((agreement - 2.0 / 3.0).abs() < 1e-9);

        VoteTally::apply(&mut world, &result).unwrap();
        let ejected = world.agent(&"Agent_1".into()).unwrap();
        assert_eq!(ejected.status(), AgentStatus::Ejected);
        assert_eq!(ejected.stats().ejections, 1);
        assert_eq!(ejected.stats().votes_received, 2);
        assert!(world.occupants(&"A".into()).iter().all(|o| o.as_str() != "Agent_1"));
    }

    #[test]
    fn test_tie_means_no_ejection() {
        let mut world = small_world();
        let tally = vote(
            &world,
            &[
                ("Agent_0", Some("Agent_1")),
                ("Agent_1", Some("Agent_2")),
                ("Agent_2", Some("Agent_1")),
                ("Agent_3", Some("Agent_2")),
            ],
        );
        let result = tally.tally();
        assert_eq!(result.outcome, VoteOutcome::Tie { votes: 2 });
        assert_eq!(result.agreement, None);

        VoteTally::apply(&mut world, &result).unwrap();
        assert_eq!(world.active_ids().len(), 6);
    }

    #[test]
    fn test_tie_with_skip_means_no_ejection() {
        let world = small_world();
        let tally = vote(
            &world,
            &[
                ("Agent_0", Some("Agent_1")),
                ("Agent_1", None),
                ("Agent_2", Some("Agent_1")),
                ("Agent_3", None),
            ],
        );
        assert_eq!(tally.tally().outcome, VoteOutcome::Tie { votes: 2 });
    }

    #[test]
    fn test_skip_plurality_and_no_votes() {
        let world = small_world();
        let tally = vote(
            &world,
            &[("Agent_0", None), ("Agent_1", None), ("Agent_2", Some("Agent_3"))],
        );
        assert_eq!(tally.tally().outcome, VoteOutcome::Skipped);
        assert_eq!(VoteTally::new(1).tally().outcome, VoteOutcome::NoVotes);
    }

    #[test]
    fn test_invalid_target_coerced_to_skip() {
        let mut world = small_world();
        world.eliminate(&"Agent_3".into(), &"Agent_9".into()).unwrap();
        let mut tally = VoteTally::new(1);
        let ballot = tally
            .cast(&world, &"Agent_0".into(), VoteTarget::Agent("Agent_3".into()))
            .unwrap();
        assert_eq!(ballot.target, VoteTarget::Skip);
        let ballot = tally
            .cast(&world, &"Agent_1".into(), VoteTarget::Agent("Nobody".into()))
            .unwrap();
        assert!(ballot.target.is_skip());
    }

    #[test]
    fn test_duplicate_and_inactive_voters_rejected() {
        let mut world = small_world();
        world.eliminate(&"Agent_3".into(), &"Agent_9".into()).unwrap();
        let mut tally = VoteTally::new(1);
        tally.cast(&world, &"Agent_0".into(), VoteTarget::Skip).unwrap();
        assert!(tally.cast(&world, &"Agent_0".into(), VoteTarget::Skip).is_err());
        assert!(tally.cast(&world, &"Agent_3".into(), VoteTarget::Skip).is_err());
        assert_eq!(tally.ballots().len(), 1);
    }

    #[test]
    fn test_vote_correctness_stats() {
        let mut world = small_world();
        let tally = vote(
            &world,
            &[
                ("Agent_0", Some("Agent_9")),
                ("Agent_1", Some("Agent_2")),
                ("Agent_9", Some("Agent_2")),
                ("Agent_8", Some("Agent_9")),
                ("Agent_2", None),
            ],
        );
        let result = tally.tally();
        VoteTally::apply(&mut world, &result).unwrap();

        let stats = |id: &str| world.agent(&id.into()).unwrap().stats().clone();
        assert_eq!(stats("Agent_0").correct_votes, 1);
        assert_eq!(stats("Agent_1").incorrect_votes, 1);
        assert_eq!(stats("Agent_9").correct_votes, 1);
        assert_eq!(stats("Agent_2").skipped_votes, 1);
        assert_eq!(stats("Agent_2").votes_cast, 1);
        assert_eq!(stats("Agent_2").votes_received, 2);
    }

    #[test]
    fn test_candidates_include_skip_last() {
        let world = small_world();
        let candidates = VoteTally::candidates(&world);
        assert_eq!(candidates.len(), 7);
        assert_eq!(candidates.last(), Some(&VoteTarget::Skip));
    }
}
