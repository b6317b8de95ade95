//! Parsing free-form replies into structured decisions.
//!
//! Anything that does not parse yields `None`; the caller turns that into an
//! invalid-output error and the scheduler falls back to the safe default.

use crew_domain::{AgentId, ProposedAction, VoteTarget, WorldView};
use regex::Regex;

/// Compiled reply patterns.
pub struct ReplyParser {
    button: Regex,
    targeted: Regex,
    movement: Regex,
    stay: Regex,
    skip: Regex,
    agent: Regex,
    yes_no: Regex,
}

impl ReplyParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            button: Regex::new(r"(?i)\b(?:press\s+)?(?:emergency\s+)?button\b|\bcall\s+(?:a\s+)?meeting\b")?,
            targeted: Regex::new(r"(?i)\b(tag|eliminate|kill|report)\b\s*(?:->|:)?\s*([A-Za-z0-9_]+)")?,
            movement: Regex::new(r"(?i)^(?:(?:move|go)\s*(?:to)?\s*(?:->|:)?\s*)?([A-Za-z0-9_]+)[.!]?$")?,
            stay: Regex::new(r"(?i)^(?:stay|wait|remain|idle)\b")?,
            skip: Regex::new(r"(?i)\b(?:skip|no\s+ejection|abstain|none)\b")?,
            agent: Regex::new(r"[A-Za-z]+_\d+")?,
            yes_no: Regex::new(r"(?i)^\W*(yes|no)\b")?,
        })
    }

    /// Parse a movement-phase reply.
    pub fn action(&self, reply: &str, view: &WorldView) -> Option<ProposedAction> {
        let line = first_line(reply)?;

        if let Some(caps) = self.targeted.captures(line) {
            let verb = caps.get(1)?.as_str().to_lowercase();
            let target = resolve_agent(caps.get(2)?.as_str(), known_agents(view))?;
            return Some(if verb == "report" {
                ProposedAction::Report(target)
            } else {
                ProposedAction::Eliminate(target)
            });
        }
        if self.button.is_match(line) {
            return Some(ProposedAction::CallMeeting);
        }
        if self.stay.is_match(line) {
            return Some(ProposedAction::Stay);
        }

        let name = self.movement.captures(line)?.get(1)?.as_str();
        if name.eq_ignore_ascii_case(view.location().as_str()) {
            return Some(ProposedAction::Stay);
        }
        view.adjacent_rooms
            .iter()
            .find(|r| r.room.as_str().eq_ignore_ascii_case(name))
            .map(|r| ProposedAction::Move(r.room.clone()))
    }

    /// Parse a ballot. Names outside `candidates` do not parse.
    pub fn vote(&self, reply: &str, candidates: &[VoteTarget]) -> Option<VoteTarget> {
        let line = first_line(reply)?;

        let named = self
            .agent
            .find_iter(line)
            .find_map(|m| resolve_agent(m.as_str(), candidates.iter().filter_map(VoteTarget::agent)));
        if let Some(agent) = named {
            return Some(VoteTarget::Agent(agent));
        }
        if self.skip.is_match(line) {
            return Some(VoteTarget::Skip);
        }
        // A bare id that does not follow the `Name_N` shape
        resolve_agent(line, candidates.iter().filter_map(VoteTarget::agent)).map(VoteTarget::Agent)
    }

    /// Parse a YES/NO reply.
    pub fn yes_no(&self, reply: &str) -> Option<bool> {
        let line = first_line(reply)?;
        let caps = self.yes_no.captures(line)?;
        Some(caps.get(1)?.as_str().eq_ignore_ascii_case("yes"))
    }
}

/// First non-empty line, without surrounding quotes, markup or whitespace.
fn first_line(reply: &str) -> Option<&str> {
    reply
        .lines()
        .map(|l| l.trim().trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*' | '.')).trim())
        .find(|l| !l.is_empty())
}

fn known_agents(view: &WorldView) -> impl Iterator<Item = &AgentId> {
    view.active_agents
        .iter()
        .chain(view.current_room.bodies.iter())
}

fn resolve_agent<'a>(name: &str, known: impl IntoIterator<Item = &'a AgentId>) -> Option<AgentId> {
    known
        .into_iter()
        .find(|a| a.as_str().eq_ignore_ascii_case(name))
        .cloned()
}
