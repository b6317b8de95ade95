//! Progress notification port
//!
//! Defines the interface for reporting progress while a game runs.

use crew_domain::{GameOutcome, Meeting, TickOutcome, Utterance, VoteResult};

/// Callback for progress updates during a game
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once the roster is set up
    fn on_game_start(&self, total_rounds: u32, agents: usize);

    /// Called when a round starts
    fn on_round_start(&self, round: u32);

    /// Called when a round is over (with or without a meeting)
    fn on_round_complete(&self, round: u32);

    /// Called with the result of the game
    fn on_game_over(&self, outcome: &GameOutcome);

    // ==================== Detail Callbacks ====================

    /// Called after each movement tick is resolved.
    fn on_tick(&self, _outcome: &TickOutcome) {}

    /// Called when a meeting starts.
    fn on_meeting(&self, _meeting: &Meeting) {}

    /// Called for each line spoken in a discussion.
    fn on_utterance(&self, _utterance: &Utterance) {}

    /// Called once the ballots are counted.
    fn on_vote_result(&self, _result: &VoteResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_game_start(&self, _total_rounds: u32, _agents: usize) {}
    fn on_round_start(&self, _round: u32) {}
    fn on_round_complete(&self, _round: u32) {}
    fn on_game_over(&self, _outcome: &GameOutcome) {}
}
