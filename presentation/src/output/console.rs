//! Console output formatter for game reports

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use crew_application::{AgentSummary, GameReport, MeetingRecord, RoundRecord};
use crew_domain::{AgentStatus, Faction, GameOutcome, MeetingReason, VoteOutcome, VoteResult};

/// Formats game reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &GameReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Byzantine Crew Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Seed:".cyan().bold(), report.seed));
        output.push_str(&format!(
            "{} {}\n",
            "Rounds played:".cyan().bold(),
            report.rounds_played()
        ));

        for round in &report.rounds {
            output.push_str(&Self::format_round(round));
        }

        output.push_str(&Self::section_header("Agents"));
        for agent in &report.agents {
            output.push_str(&Self::format_agent(agent));
            output.push('\n');
        }

        output.push_str(&Self::section_header("Result"));
        output.push_str(&Self::format_outcome(&report.outcome));
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &GameReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the result and survivors only
    pub fn format_summary(report: &GameReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Byzantine Crew ===".cyan().bold()));
        output.push_str(&Self::format_outcome(&report.outcome));
        output.push_str("\n\n");

        let meetings = report.meetings().count();
        let ejected: Vec<String> = report
            .meetings()
            .filter_map(|m| m.vote.outcome.ejected())
            .map(|id| id.to_string())
            .collect();
        output.push_str(&format!(
            "{} {} rounds, {} meetings, ejected: {}\n",
            "Played:".dimmed(),
            report.rounds_played(),
            meetings,
            if ejected.is_empty() {
                "none".to_string()
            } else {
                ejected.join(", ")
            }
        ));

        let survivors: Vec<String> = report
            .agents
            .iter()
            .filter(|a| a.status.is_active())
            .map(|a| format!("{} ({})", a.id, a.faction))
            .collect();
        output.push_str(&format!(
            "{} {}\n",
            "Survivors:".dimmed(),
            survivors.join(", ")
        ));

        output
    }

    /// One round: eliminations, then the meeting if one was held
    pub fn format_round(round: &RoundRecord) -> String {
        let mut output = Self::section_header(&format!(
            "Round {} ({} ticks)",
            round.round, round.ticks_played
        ));

        if round.eliminations.is_empty() && round.meeting.is_none() {
            output.push_str(&format!("{}\n", "Quiet round".dimmed()));
        }

        for e in &round.eliminations {
            output.push_str(&format!(
                "{} {} eliminated {} in {}\n",
                "x".red(),
                e.actor,
                e.victim,
                e.room
            ));
        }

        if let Some(meeting) = &round.meeting {
            output.push_str(&Self::format_meeting(meeting));
        }
        output
    }

    fn format_meeting(record: &MeetingRecord) -> String {
        let mut output = String::new();

        let title = match &record.meeting.reason {
            MeetingReason::BodyReport { body, .. } => {
                format!("── Body of {} reported by {} ──", body, record.meeting.caller)
            }
            MeetingReason::EmergencyButton => {
                format!("── Emergency meeting by {} ──", record.meeting.caller)
            }
        };
        output.push_str(&format!("\n{}\n", title.yellow().bold()));
        output.push_str(&format!("{}\n\n", record.meeting.summary().dimmed()));

        for u in &record.transcript.utterances {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{}:", u.speaker).bold(),
                u.text
            ));
        }

        output.push('\n');
        output.push_str(&Self::format_vote(&record.vote));
        output
    }

    /// Vote counts followed by the outcome line
    pub fn format_vote(vote: &VoteResult) -> String {
        let mut output = format!("{}\n", "Votes:".cyan().bold());
        for (target, count) in &vote.counts {
            output.push_str(&format!("  {:<12} {}\n", target.to_string(), count));
        }
        output.push_str(&format!("{}\n", Self::describe_vote(vote)));
        output
    }

    /// Plain description of a vote outcome
    pub fn describe_vote(vote: &VoteResult) -> String {
        match &vote.outcome {
            VoteOutcome::Ejected { target, votes } => {
                let agreement = vote
                    .agreement
                    .map(|a| format!(", {:.0}% agreement", a * 100.0))
                    .unwrap_or_default();
                format!("{} ejected ({} votes{})", target, votes, agreement)
                    .red()
                    .bold()
                    .to_string()
            }
            VoteOutcome::Tie { votes } => {
                format!("Tie at {} votes, no one ejected", votes).yellow().to_string()
            }
            VoteOutcome::Skipped => "Vote skipped, no one ejected".yellow().to_string(),
            VoteOutcome::NoVotes => "No votes cast".dimmed().to_string(),
        }
    }

    fn format_agent(agent: &AgentSummary) -> String {
        let faction = match agent.faction {
            Faction::Honest => agent.faction.to_string().green(),
            Faction::Adversarial => agent.faction.to_string().red(),
        };
        let status = match agent.status {
            AgentStatus::Active => agent.status.as_str().normal(),
            AgentStatus::Eliminated | AgentStatus::Ejected => agent.status.as_str().dimmed(),
        };
        let s = &agent.stats;
        format!(
            "  {:<10} {:<12} {:<11} {:<14} votes {}/{} correct, {} skipped, {} eliminations [{}]",
            agent.id.as_str(),
            faction,
            status,
            agent.location.as_str(),
            s.correct_votes,
            s.votes_cast,
            s.skipped_votes,
            s.eliminations,
            s.label
        )
    }

    fn format_outcome(outcome: &GameOutcome) -> String {
        let winner = match outcome.winner {
            Faction::Honest => "Honest agents win".green().bold(),
            Faction::Adversarial => "Adversaries win".red().bold(),
        };
        format!(
            "{}: {} in round {} ({} honest, {} adversarial remaining)",
            winner,
            outcome.reason.as_str(),
            outcome.round,
            outcome.honest_remaining,
            outcome.adversarial_remaining
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &GameReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &GameReport) -> String {
        Self::format_json(report)
    }

    fn format_summary(&self, report: &GameReport) -> String {
        Self::format_summary(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_domain::{
        AgentId, Ballot, DiscussionPass, Elimination, Meeting, Transcript, VoteTarget,
    };

    fn plain() {
        colored::control::set_override(false);
    }

    fn vote(outcome: VoteOutcome, agreement: Option<f64>) -> VoteResult {
        VoteResult {
            round: 2,
            ballots: vec![Ballot {
                voter: AgentId::from("Agent_0"),
                target: VoteTarget::Agent(AgentId::from("Agent_4")),
                round: 2,
            }],
            counts: vec![
                (VoteTarget::Agent(AgentId::from("Agent_4")), 3),
                (VoteTarget::Skip, 2),
            ],
            outcome,
            agreement,
        }
    }

    #[test]
    fn test_describe_ejection_with_agreement() {
        plain();
        let v = vote(
            VoteOutcome::Ejected {
                target: AgentId::from("Agent_4"),
                votes: 3,
            },
            Some(0.6),
        );
        assert_eq!(
            ConsoleFormatter::describe_vote(&v),
            "Agent_4 ejected (3 votes, 60% agreement)"
        );
    }

    #[test]
    fn test_describe_tie_and_skip() {
        plain();
        let tie = vote(VoteOutcome::Tie { votes: 2 }, None);
        assert_eq!(
            ConsoleFormatter::describe_vote(&tie),
            "Tie at 2 votes, no one ejected"
        );
        let skipped = vote(VoteOutcome::Skipped, None);
        assert!(ConsoleFormatter::describe_vote(&skipped).contains("skipped"));
    }

    #[test]
    fn test_vote_lists_counts() {
        plain();
        let v = vote(VoteOutcome::Tie { votes: 2 }, None);
        let text = ConsoleFormatter::format_vote(&v);
        assert!(text.contains("Agent_4"));
        assert!(text.contains("SKIP"));
    }

    #[test]
    fn test_quiet_round() {
        plain();
        let round = RoundRecord {
            round: 1,
            ticks_played: 4,
            eliminations: vec![],
            meeting: None,
        };
        let text = ConsoleFormatter::format_round(&round);
        assert!(text.contains("Round 1 (4 ticks)"));
        assert!(text.contains("Quiet round"));
    }

    #[test]
    fn test_round_with_meeting() {
        plain();
        let mut transcript = Transcript::new(2, "Meeting called by Agent_0.");
        transcript.push(
            &AgentId::from("Agent_0"),
            DiscussionPass::Opening,
            "I saw Agent_4 near the body.",
        );
        let round = RoundRecord {
            round: 2,
            ticks_played: 2,
            eliminations: vec![Elimination {
                actor: AgentId::from("Agent_4"),
                victim: AgentId::from("Agent_1"),
                room: "Admin".into(),
            }],
            meeting: Some(MeetingRecord {
                meeting: Meeting {
                    round: 2,
                    tick: 2,
                    caller: AgentId::from("Agent_0"),
                    reason: MeetingReason::BodyReport {
                        body: AgentId::from("Agent_1"),
                        room: "Admin".into(),
                    },
                    revealed: vec![],
                },
                transcript,
                vote: vote(
                    VoteOutcome::Ejected {
                        target: AgentId::from("Agent_4"),
                        votes: 3,
                    },
                    Some(0.6),
                ),
            }),
        };

        let text = ConsoleFormatter::format_round(&round);
        assert!(text.contains("Agent_4 eliminated Agent_1 in Admin"));
        assert!(text.contains("Body of Agent_1 reported by Agent_0"));
        assert!(text.contains("Agent_0:"));
        assert!(text.contains("Agent_4 ejected"));
    }
}
