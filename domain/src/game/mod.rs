//! Game rules over a [`WorldState`](crate::world::WorldState)
//!
//! - [`action`] - actions proposed during movement
//! - [`resolver`] - priority resolution of one movement tick
//! - [`meeting`] - meeting state machine
//! - [`discussion`] - speaking order and transcript
//! - [`vote`] - ballots, tally and ejection
//! - [`win`] - win conditions

pub mod action;
pub mod discussion;
pub mod meeting;
pub mod resolver;
pub mod vote;
pub mod win;

pub use action::{ActionTag, ProposedAction};
pub use discussion::{
    DISCUSSION_PASSES, DiscussionPass, Transcript, Utterance, normalize_utterance, speaking_order,
};
pub use meeting::{Meeting, MeetingController, MeetingPhase, MeetingReason};
pub use resolver::{
    ActionResolver, Elimination, Movement, RejectReason, Rejection, ReportCandidate, TickOutcome,
    resolve_tick,
};
pub use vote::{Ballot, VoteOutcome, VoteResult, VoteTally, VoteTarget};
pub use win::{GameOutcome, WinReason, evaluate, evaluate_final};
