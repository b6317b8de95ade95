//! Final per-agent statistics export.

use chrono::{DateTime, Utc};
use crew_application::GameReport;
use crew_domain::{AgentId, AgentStats, AgentStatus, Faction, GameOutcome};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsExportError {
    #[error("Failed to write stats to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize stats: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct StatsRow<'a> {
    id: &'a AgentId,
    faction: Faction,
    status: AgentStatus,
    #[serde(flatten)]
    stats: &'a AgentStats,
}

#[derive(Debug, Serialize)]
struct StatsDocument<'a> {
    seed: u64,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    rounds_played: usize,
    outcome: &'a GameOutcome,
    agents: Vec<StatsRow<'a>>,
}

/// Render the stats document for a finished game.
pub fn render_stats(report: &GameReport) -> Result<String, StatsExportError> {
    let document = StatsDocument {
        seed: report.seed,
        started_at: report.started_at,
        finished_at: report.finished_at,
        rounds_played: report.rounds_played(),
        outcome: &report.outcome,
        agents: report
            .agents
            .iter()
            .map(|a| StatsRow {
                id: &a.id,
                faction: a.faction,
                status: a.status,
                stats: &a.stats,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write the stats document to `path`, creating parent directories.
pub fn export_stats(report: &GameReport, path: &Path) -> Result<(), StatsExportError> {
    let body = render_stats(report)?;
    let io_err = |source| StatsExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, body).map_err(io_err)
}

/// Log and stats file names for one game under `dir`.
pub fn game_file_paths(dir: &Path, seed: u64, started_at: DateTime<Utc>) -> (PathBuf, PathBuf) {
    let stem = format!("game-{}-{}", started_at.format("%Y%m%dT%H%M%S"), seed);
    (
        dir.join(format!("{stem}.jsonl")),
        dir.join(format!("{stem}.stats.json")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crew_application::{RunGameInput, RunGameUseCase};
    use crew_domain::{GameRules, RoomGraph};
    use std::sync::Arc;

    async fn finished_game() -> GameReport {
        let factory = crate::providers::HeuristicFactory::new(5);
        RunGameUseCase::new(Arc::new(factory))
            .execute(RunGameInput::new(
                GameRules::default().with_round_budget(2),
                RoomGraph::station(),
                5,
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_export_writes_one_row_per_agent() {
        let report = finished_game().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/stats.json");

        export_stats(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let agents = value["agents"].as_array().unwrap();
        assert_eq!(agents.len(), 10);
        assert_eq!(agents[0]["id"], "Agent_0");
        assert!(agents[0].get("votes_cast").is_some());
        assert!(agents[0].get("won_game").is_some());
        assert_eq!(value["seed"], 5);
        assert!(value["outcome"]["winner"].is_string());
    }

    #[test]
    fn test_game_file_paths() {
        let started = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 5).unwrap();
        let (log, stats) = game_file_paths(Path::new("logs"), 42, started);
        assert_eq!(log, PathBuf::from("logs/game-20250301T123005-42.jsonl"));
        assert_eq!(stats, PathBuf::from("logs/game-20250301T123005-42.stats.json"));
    }
}
