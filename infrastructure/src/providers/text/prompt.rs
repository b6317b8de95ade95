//! Prompt construction from an agent's [`WorldView`].

use crew_domain::{AgentId, Faction, RoomId, RoomView, Transcript, VoteTarget, WorldView};
use std::fmt::Write;

pub fn system_prompt(view: &WorldView) -> String {
    match view.faction {
        Faction::Honest => format!(
            "You are {}, an honest crew member. Cooperate with the other honest agents to \
             find and vote out the adversaries, who try to eliminate you. \
             Respond ONLY with what the prompt asks for.",
            view.id
        ),
        Faction::Adversarial => format!(
            "You are {}, a hidden adversary. Eliminate honest agents without being caught \
             and steer the votes away from yourself and your teammates. \
             Respond ONLY with what the prompt asks for.",
            view.id
        ),
    }
}

pub fn action_prompt(view: &WorldView, round: u32) -> String {
    let mut prompt = situation(view, round);

    let _ = writeln!(prompt, "\nAdjacent rooms and their occupants:");
    for room in &view.adjacent_rooms {
        let _ = writeln!(prompt, "- {}: {}", room.room, occupants(room));
    }

    let _ = writeln!(prompt, "\nYour available actions:");
    let _ = writeln!(prompt, "- move -> <Room>  (an adjacent room)");
    let _ = writeln!(prompt, "- stay");
    if !view.current_room.bodies.is_empty() {
        let _ = writeln!(prompt, "- report -> <Agent>  (a body in this room)");
    }
    if view.can_call_meeting() {
        let _ = writeln!(prompt, "- button  (call an emergency meeting, once per game)");
    }
    if view.faction == Faction::Adversarial {
        let _ = writeln!(
            prompt,
            "- tag -> <Agent>  (eliminate a non-teammate in this room; not two ticks in a row)"
        );
    }
    let _ = write!(prompt, "\nReply with exactly one action line.");
    prompt
}

pub fn speak_prompt(view: &WorldView, transcript: &Transcript, round: u32) -> String {
    let mut prompt = situation(view, round);
    let _ = writeln!(prompt, "\nA meeting is underway.");
    let _ = writeln!(prompt, "{}", transcript.render().trim_end());
    let _ = write!(
        prompt,
        "\nWhat do you say? Keep it to one line (fewer than 25 words). \
         State what you saw, question others, or defend yourself."
    );
    prompt
}

pub fn vote_prompt(view: &WorldView, candidates: &[VoteTarget], round: u32) -> String {
    let mut prompt = situation(view, round);
    let names: Vec<String> = candidates
        .iter()
        .filter(|c| !c.is_skip())
        .map(ToString::to_string)
        .collect();
    let _ = writeln!(prompt, "\nYou must vote to eject one agent or skip.");
    let _ = writeln!(prompt, "Candidates: {}", names.join(", "));
    let _ = write!(
        prompt,
        "Reply with ONE name from the list, or SKIP if no one stands out. Do not explain."
    );
    prompt
}

pub fn report_prompt(view: &WorldView, bodies: &[AgentId], room: &RoomId) -> String {
    let company = if view.current_room.occupants.is_empty() {
        "You are alone with the bodies.".to_string()
    } else {
        format!(
            "The other living agents here are: {}.",
            join(&view.current_room.occupants)
        )
    };
    format!(
        "You are in {} and have found the bodies of: {}.\n{}\n\
         Reporting calls a meeting immediately.\n\
         Should you report now? Respond with only YES or NO.",
        room,
        join(bodies),
        company
    )
}

/// Shared header: round, room, company, memory and team status.
fn situation(view: &WorldView, round: u32) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Round {} of {}.", round, view.round_budget);
    let _ = writeln!(
        text,
        "You are in {} with {}.",
        view.current_room.room,
        occupants(&view.current_room)
    );
    if !view.current_room.bodies.is_empty() {
        let _ = writeln!(
            text,
            "Bodies in this room: {}.",
            join(&view.current_room.bodies)
        );
    }

    if !view.recent_perception.is_empty() {
        let _ = writeln!(text, "What you saw recently:");
        for entry in &view.recent_perception {
            let seen = if entry.agents_seen.is_empty() {
                "no one".to_string()
            } else {
                join(&entry.agents_seen)
            };
            let _ = write!(
                text,
                "- round {} tick {}: {} with {}",
                entry.round, entry.tick, entry.room, seen
            );
            if !entry.bodies_seen.is_empty() {
                let _ = write!(text, "; bodies: {}", join(&entry.bodies_seen));
            }
            let _ = writeln!(text);
        }
    }

    if let Some(honest) = view.honest_remaining {
        let teammates: Vec<String> = view
            .teammates
            .iter()
            .map(|t| format!("{} ({})", t.id, t.status))
            .collect();
        let _ = writeln!(
            text,
            "Honest agents remaining: {}. Your teammates: {}.",
            honest,
            if teammates.is_empty() {
                "none".to_string()
            } else {
                teammates.join(", ")
            }
        );
    }
    let _ = writeln!(text, "Active agents: {}.", join(&view.active_agents));
    text
}

fn occupants(room: &RoomView) -> String {
    if room.occupants.is_empty() {
        "no one".to_string()
    } else {
        join(&room.occupants)
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
