//! Discussion phase rules
//!
//! The caller speaks first, then the remaining active agents in registry
//! order. The whole order is walked twice.

use crate::agent::AgentId;
use crate::world::WorldState;
use serde::{Deserialize, Serialize};

/// Number of passes over the speaking order.
pub const DISCUSSION_PASSES: [DiscussionPass; 2] = [DiscussionPass::Opening, DiscussionPass::Rebuttal];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionPass {
    Opening,
    Rebuttal,
}

impl DiscussionPass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionPass::Opening => "opening",
            DiscussionPass::Rebuttal => "rebuttal",
        }
    }
}

/// One spoken line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: AgentId,
    pub pass: DiscussionPass,
    pub text: String,
}

/// Ordered record of a meeting's discussion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub round: u32,
    /// Meeting summary opening the discussion
    pub preamble: String,
    pub utterances: Vec<Utterance>,
}

impl Transcript {
    pub fn new(round: u32, preamble: impl Into<String>) -> Self {
        Self {
            round,
            preamble: preamble.into(),
            utterances: Vec::new(),
        }
    }

    /// Normalize `raw` and append it. Returns the stored text.
    pub fn push(&mut self, speaker: &AgentId, pass: DiscussionPass, raw: &str) -> &str {
        let text = normalize_utterance(speaker, raw);
        self.utterances.push(Utterance {
            speaker: speaker.clone(),
            pass,
            text,
        });
        self.utterances
            .last()
            .map(|u| u.text.as_str())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Plain-text rendering, one `speaker: text` line per utterance.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.preamble.is_empty() {
            out.push_str(&self.preamble);
            out.push('\n');
        }
        for u in &self.utterances {
            out.push_str(u.speaker.as_str());
            out.push_str(": ");
            out.push_str(&u.text);
            out.push('\n');
        }
        out
    }
}

/// Caller first (if still active), then every other active agent in
/// registry order.
pub fn speaking_order(world: &WorldState) -> Vec<AgentId> {
    let caller = world
        .meeting()
        .map(|m| m.caller.clone())
        .filter(|c| world.is_active(c));
    let mut order: Vec<AgentId> = caller.iter().cloned().collect();
    order.extend(
        world
            .active_agents()
            .map(|a| a.id().clone())
            .filter(|id| Some(id) != caller.as_ref()),
    );
    order
}

/// Clean up a raw utterance: newlines become spaces, a leading speaker
/// prefix (`Agent_3:` or `**Agent_3:**`) is dropped, and surrounding quotes
/// are stripped.
pub fn normalize_utterance(speaker: &AgentId, raw: &str) -> String {
    let flat = raw
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let text = strip_speaker_prefix(speaker, flat.trim());
    strip_quotes(text.trim()).trim().to_string()
}

fn strip_speaker_prefix<'a>(speaker: &AgentId, text: &'a str) -> &'a str {
    let body = text.strip_prefix("**").unwrap_or(text);

    let rest = match body.strip_prefix(speaker.as_str()) {
        Some(rest) => Some(rest),
        None => body
            .strip_prefix("Agent_")
            .map(|r| r.trim_start_matches(|c: char| c.is_ascii_digit()))
            .filter(|r| r.len() < body.len() - "Agent_".len()),
    };
    let Some(rest) = rest else {
        return text;
    };

    let rest = rest.strip_prefix("**").unwrap_or(rest);
    match rest.strip_prefix(':') {
        Some(rest) => rest.strip_prefix("**").unwrap_or(rest).trim_start(),
        None => text,
    }
}

fn strip_quotes(text: &str) -> &str {
    for (open, close) in [('"', '"'), ('\'', '\''), ('\u{201c}', '\u{201d}')] {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|t| t.strip_suffix(close))
        {
            return inner;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::meeting::{MeetingController, MeetingReason};
    use crate::test_support::{honest, line_world};

    fn speaker() -> AgentId {
        AgentId::new("Agent_3")
    }

    #[test]
    fn test_normalize_strips_prefix_and_quotes() {
        assert_eq!(
            normalize_utterance(&speaker(), "Agent_3: \"I was in Admin.\""),
            "I was in Admin."
        );
        assert_eq!(
            normalize_utterance(&speaker(), "**Agent_3:** I saw Agent_1 near O2"),
            "I saw Agent_1 near O2"
        );
    }

    #[test]
    fn test_normalize_collapses_newlines() {
        assert_eq!(
            normalize_utterance(&speaker(), "I was in Admin.\n\nThen I went to Storage."),
            "I was in Admin. Then I went to Storage."
        );
    }

    #[test]
    fn test_normalize_keeps_names_mid_sentence() {
        assert_eq!(
            normalize_utterance(&speaker(), "Agent_1 is lying"),
            "Agent_1 is lying"
        );
        assert_eq!(normalize_utterance(&speaker(), "Agent_: hi"), "Agent_: hi");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_utterance(&speaker(), "  \n "), "");
    }

    #[test]
    fn test_speaking_order_caller_first() {
        let mut world = line_world(&[
            honest("Agent_0", "A"),
            honest("Agent_1", "A"),
            honest("Agent_2", "A"),
        ]);
        world.begin_round(1);
        MeetingController::trigger(&mut world, &"Agent_2".into(), MeetingReason::EmergencyButton)
            .unwrap();

        let order: Vec<String> = speaking_order(&world)
            .iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(
            order,
            vec!["Agent_2", "Agent_0", "Agent_1", "Agent_8", "Agent_9"]
        );
    }

    #[test]
    fn test_speaking_order_skips_terminal_agents() {
        let mut world = line_world(&[
            honest("Agent_0", "D"),
            honest("Agent_1", "A"),
            honest("Agent_2", "A"),
        ]);
        world.begin_round(1);
        world.eliminate(&"Agent_0".into(), &"Agent_9".into()).unwrap();
        let order = speaking_order(&world);
        assert_eq!(order.len(), 4);
        assert!(!order.contains(&"Agent_0".into()));
    }

    #[test]
    fn test_transcript_render() {
        let mut transcript = Transcript::new(2, "Meeting called by Agent_3.");
        transcript.push(&speaker(), DiscussionPass::Opening, "Agent_3: hello");
        assert_eq!(
            transcript.render(),
            "Meeting called by Agent_3.\nAgent_3: hello\n"
        );
        assert_eq!(transcript.len(), 1);
    }
}
