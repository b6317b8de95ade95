//! Domain layer for byzantine-crew
//!
//! This crate contains the game rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## World
//!
//! A fixed graph of rooms ([`RoomGraph`]) and a single mutable
//! [`WorldState`] holding every agent, room occupancy and the round state.
//!
//! ## Rounds
//!
//! Each round runs movement ticks resolved by [`ActionResolver`] until a
//! meeting starts or the tick budget runs out. A meeting runs a discussion
//! and a vote ([`VoteTally`]), then the win conditions are checked
//! ([`game::win::evaluate`]).

pub mod agent;
pub mod core;
pub mod game;
pub mod map;
pub mod world;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use agent::{
    Agent, AgentId, AgentSpec, AgentStats, AgentStatus, Faction, KnownBody, PerceptionEntry,
    PerceptionLog,
};
pub use core::{
    error::DomainError,
    rules::{
        DEFAULT_PERCEPTION_WINDOW, DEFAULT_ROUND_BUDGET, DEFAULT_TICKS_PER_ROUND, GameRules,
        validate_roster,
    },
};
pub use game::{
    ActionResolver, ActionTag, Ballot, DISCUSSION_PASSES, DiscussionPass, Elimination,
    GameOutcome, Meeting, MeetingController, MeetingPhase, MeetingReason, Movement,
    ProposedAction, RejectReason, Rejection, ReportCandidate, TickOutcome, Transcript, Utterance,
    VoteOutcome, VoteResult, VoteTally, VoteTarget, WinReason,
};
pub use map::{RoomGraph, RoomId};
pub use world::{GamePhase, MeetingBrief, RoomView, TeammateView, WorldState, WorldView};
