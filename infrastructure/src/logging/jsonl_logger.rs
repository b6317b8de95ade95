//! Game event log, one JSON object per line.
//!
//! Every line carries the game id (the log file stem), a sequence number,
//! the event type and a millisecond RFC3339 timestamp next to the event
//! payload. Lines are buffered for a whole round and written out when the
//! round or the game ends.

use crew_application::ports::game_logger::{GameEvent, GameLogger};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Events that close a round of the log.
const FLUSH_EVENTS: &[&str] = &["round_result", "game_over"];

struct LogState {
    writer: BufWriter<File>,
    seq: u64,
}

pub struct JsonlGameLogger {
    state: Mutex<LogState>,
    game_id: String,
    path: PathBuf,
}

impl JsonlGameLogger {
    /// Open `path` for one game, creating parent directories.
    ///
    /// Logging is best effort: `None` (with a warning) when the file cannot
    /// be created, and the game runs without a log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create game log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create game log file {}: {}", path.display(), e);
                return None;
            }
        };

        let game_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "game".to_string());

        Some(Self {
            state: Mutex::new(LogState {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            game_id,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    fn record(&self, seq: u64, event: GameEvent) -> Value {
        let mut record = Map::new();
        record.insert("seq".to_string(), Value::from(seq));
        record.insert("game_id".to_string(), Value::from(self.game_id.as_str()));
        record.insert("type".to_string(), Value::from(event.event_type));
        record.insert(
            "timestamp".to_string(),
            Value::from(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
        match event.payload {
            Value::Object(payload) => {
                for (key, value) in payload {
                    record.entry(key).or_insert(value);
                }
            }
            other => {
                record.insert("data".to_string(), other);
            }
        }
        Value::Object(record)
    }
}

impl GameLogger for JsonlGameLogger {
    fn log(&self, event: GameEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let flush = FLUSH_EVENTS.contains(&event.event_type);
        state.seq += 1;
        let record = self.record(state.seq, event);

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        if let Err(e) = writeln!(state.writer, "{}", line) {
            warn!("Could not write game log {}: {}", self.path.display(), e);
            return;
        }
        if flush && let Err(e) = state.writer.flush() {
            warn!("Could not flush game log {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlGameLogger {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            let _ = state.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.jsonl");
        let logger = JsonlGameLogger::new(&path).unwrap();

        logger.log(GameEvent::new(
            "round_started",
            json!({ "round": 1, "active": ["Agent_0", "Agent_1"] }),
        ));
        logger.log(GameEvent::new(
            "elimination",
            json!({ "round": 1, "tick": 2, "victim": "Agent_1" }),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for (i, value) in lines.iter().enumerate() {
            assert_eq!(value["seq"], i as u64 + 1);
            assert_eq!(value["game_id"], "game");
            assert!(value.get("timestamp").is_some());
        }
        assert_eq!(lines[0]["type"], "round_started");
        assert_eq!(lines[0]["active"][1], "Agent_1");
        assert_eq!(lines[1]["type"], "elimination");
        assert_eq!(lines[1]["tick"], 2);

        let timestamp = lines[0]["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_jsonl_logger_handles_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/game.jsonl");
        let logger = JsonlGameLogger::new(&path).unwrap();

        logger.log(GameEvent::new("note", json!("just a string")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "note");
        assert_eq!(lines[0]["data"], "just a string");
    }

    #[test]
    fn test_jsonl_logger_flushes_at_round_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game-20261019T120000-42.jsonl");
        let logger = JsonlGameLogger::new(&path).unwrap();
        assert_eq!(logger.game_id(), "game-20261019T120000-42");

        logger.log(GameEvent::new("round_started", json!({ "round": 1 })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        logger.log(GameEvent::new("round_result", json!({ "round": 1 })));
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["type"], "round_result");
        assert_eq!(lines[1]["game_id"], "game-20261019T120000-42");
    }

    #[test]
    fn test_jsonl_logger_keeps_envelope_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.jsonl");
        let logger = JsonlGameLogger::new(&path).unwrap();

        logger.log(GameEvent::new("vote", json!({ "type": "spoofed", "round": 2 })));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "vote");
        assert_eq!(lines[0]["round"], 2);
    }

    #[test]
    fn test_jsonl_logger_returns_none_for_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlGameLogger::new(dir.path()).is_none());
    }
}
