//! Progress reporting for game execution

use colored::Colorize;
use crew_application::{NoProgress, ProgressNotifier};
use crew_domain::{Faction, GameOutcome, Meeting, TickOutcome, Utterance, VoteResult};
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::console::ConsoleFormatter;

/// Reports progress with a round bar; meetings are printed above it
pub struct ProgressReporter {
    bar: ProgressBar,
    show_discussion: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            show_discussion: false,
        }
    }

    /// Also print every utterance as it is spoken
    pub fn with_discussion(mut self, show: bool) -> Self {
        self.show_discussion = show;
        self
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_game_start(&self, total_rounds: u32, agents: usize) {
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_length(total_rounds as u64);
        self.bar.set_style(Self::round_style());
        self.bar.set_prefix("Rounds");
        self.bar.set_message(format!("{} agents", agents));
    }

    fn on_round_start(&self, round: u32) {
        self.bar.set_message(format!("Round {}", round));
    }

    fn on_round_complete(&self, _round: u32) {
        self.bar.inc(1);
    }

    fn on_game_over(&self, outcome: &GameOutcome) {
        let message = match outcome.winner {
            Faction::Honest => "Honest agents win".green(),
            Faction::Adversarial => "Adversaries win".red(),
        };
        self.bar.finish_with_message(message.to_string());
    }

    fn on_tick(&self, outcome: &TickOutcome) {
        for e in &outcome.eliminations {
            self.bar
                .println(format!("  {} {} was eliminated in {}", "x".red(), e.victim, e.room));
        }
        self.bar
            .set_message(format!("Round {} tick {}", outcome.round, outcome.tick));
    }

    fn on_meeting(&self, meeting: &Meeting) {
        self.bar
            .println(format!("{} {}", "!".yellow().bold(), meeting.summary()));
    }

    fn on_utterance(&self, utterance: &Utterance) {
        if self.show_discussion {
            self.bar
                .println(format!("    {}: {}", utterance.speaker, utterance.text));
        }
    }

    fn on_vote_result(&self, result: &VoteResult) {
        self.bar
            .println(format!("  {}", ConsoleFormatter::describe_vote(result)));
    }
}

/// How progress is shown while a game runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Nothing until the final report
    Hidden,
    /// Round bar for interactive terminals
    Bar,
    /// Plain lines, for pipes and log capture
    Lines,
}

impl ProgressMode {
    /// `interactive` tells whether stderr is a terminal.
    pub fn detect(quiet: bool, interactive: bool) -> Self {
        match (quiet, interactive) {
            (true, _) => ProgressMode::Hidden,
            (false, true) => ProgressMode::Bar,
            (false, false) => ProgressMode::Lines,
        }
    }

    pub fn notifier(self, show_discussion: bool) -> Box<dyn ProgressNotifier> {
        match self {
            ProgressMode::Hidden => Box::new(NoProgress),
            ProgressMode::Bar => Box::new(ProgressReporter::new().with_discussion(show_discussion)),
            ProgressMode::Lines => Box::new(SimpleProgress),
        }
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_game_start(&self, total_rounds: u32, agents: usize) {
        eprintln!(
            "{} {} ({} rounds, {} agents)",
            "->".cyan(),
            "Game started".bold(),
            total_rounds,
            agents
        );
    }

    fn on_round_start(&self, round: u32) {
        eprintln!("{} Round {}", "->".cyan(), round);
    }

    fn on_round_complete(&self, _round: u32) {}

    fn on_game_over(&self, outcome: &GameOutcome) {
        eprintln!(
            "{} {} wins ({})",
            "v".green(),
            outcome.winner,
            outcome.reason.as_str()
        );
    }

    fn on_tick(&self, outcome: &TickOutcome) {
        for e in &outcome.eliminations {
            eprintln!("  {} {} eliminated in {}", "x".red(), e.victim, e.room);
        }
    }

    fn on_meeting(&self, meeting: &Meeting) {
        eprintln!("  {} {}", "!".yellow(), meeting.summary());
    }

    fn on_vote_result(&self, result: &VoteResult) {
        eprintln!("  {}", ConsoleFormatter::describe_vote(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_domain::WinReason;

    #[test]
    fn test_progress_mode_detection() {
        assert_eq!(ProgressMode::detect(true, true), ProgressMode::Hidden);
        assert_eq!(ProgressMode::detect(true, false), ProgressMode::Hidden);
        assert_eq!(ProgressMode::detect(false, true), ProgressMode::Bar);
        assert_eq!(ProgressMode::detect(false, false), ProgressMode::Lines);
    }

    #[test]
    fn test_reporter_tracks_rounds() {
        let reporter = ProgressReporter::new();
        reporter.on_game_start(3, 10);
        reporter.bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        reporter.on_round_start(1);
        reporter.on_round_complete(1);
        reporter.on_round_start(2);
        reporter.on_round_complete(2);
        assert_eq!(reporter.bar.position(), 2);
        assert_eq!(reporter.bar.length(), Some(3));

        reporter.on_game_over(&GameOutcome {
            winner: Faction::Honest,
            reason: WinReason::AdversariesRemoved,
            round: 2,
            honest_remaining: 7,
            adversarial_remaining: 0,
        });
        assert!(reporter.bar.is_finished());
    }
}
