//! Private perception log of an agent.

use super::value_objects::AgentId;
use crate::map::RoomId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What an agent saw in its room at the end of one movement tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptionEntry {
    pub round: u32,
    pub tick: u32,
    pub room: RoomId,
    /// Other active agents in the room
    pub agents_seen: Vec<AgentId>,
    /// Undiscovered bodies in the room
    pub bodies_seen: Vec<AgentId>,
}

/// Append-only perception record capped to the most recent `window` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptionLog {
    window: usize,
    entries: VecDeque<PerceptionEntry>,
}

impl PerceptionLog {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, entry: PerceptionEntry) {
        if self.entries.len() == self.window {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &PerceptionEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&PerceptionEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tick: u32) -> PerceptionEntry {
        PerceptionEntry {
            round: 1,
            tick,
            room: RoomId::new("Admin"),
            agents_seen: vec![],
            bodies_seen: vec![],
        }
    }

    #[test]
    fn test_log_is_capped_to_window() {
        let mut log = PerceptionLog::new(3);
        for tick in 1..=5 {
            log.push(entry(tick));
        }
        assert_eq!(log.len(), 3);
        let ticks: Vec<u32> = log.entries().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![3, 4, 5]);
        assert_eq!(log.latest().map(|e| e.tick), Some(5));
    }

    #[test]
    fn test_zero_window_keeps_one_entry() {
        let mut log = PerceptionLog::new(0);
        log.push(entry(1));
        log.push(entry(2));
        assert_eq!(log.len(), 1);
        assert_eq!(log.window(), 1);
    }
}
