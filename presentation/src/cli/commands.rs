//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round with meetings, transcripts and votes
    Full,
    /// Only the result and the survivors
    Summary,
    /// JSON output
    Json,
}

/// Decision provider driving the agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderChoice {
    /// Seeded rule-based bots
    Heuristic,
    /// A local command answering prompts on stdout
    Command,
}

/// CLI arguments for byzantine-crew
#[derive(Parser, Debug)]
#[command(name = "byzantine-crew")]
#[command(author, version, about = "Hidden-role simulation of honest and adversarial agents")]
#[command(long_about = r#"
Byzantine Crew runs a hidden-role game on a map of rooms. Honest agents try to
find and vote out the adversaries; adversaries eliminate honest agents while
staying hidden.

Each round has up to N movement ticks. A reported body or the emergency
button starts a meeting: two passes of discussion, then a vote.

Configuration files are loaded from (in priority order):
1. CREW_* environment variables (e.g. CREW_GAME__ROUNDS=5)
2. --config <path>     Explicit config file
3. ./crew.toml         Project-level config
4. ~/.config/byzantine-crew/config.toml   Global config

Example:
  byzantine-crew --seed 42
  byzantine-crew --rounds 5 --honest 6 --adversarial 1 -o summary
  byzantine-crew --provider command --command "ollama run llama3" --log-dir logs
"#)]
pub struct Cli {
    /// Seed for roster assignment and bots (random when omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of rounds
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Movement ticks per round
    #[arg(long, value_name = "N")]
    pub ticks: Option<u32>,

    /// Number of honest agents
    #[arg(long, value_name = "N")]
    pub honest: Option<usize>,

    /// Number of adversarial agents
    #[arg(long, value_name = "N")]
    pub adversarial: Option<usize>,

    /// Decision provider for every agent
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderChoice>,

    /// Command for the `command` provider (prompt on stdin, reply on stdout)
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Per-decision timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format [default: full]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Directory for the JSONL event log and stats export
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Also write tracing output to a file in the log directory
    #[arg(long)]
    pub trace_file: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip global, project and environment configuration (--config is still read)
    #[arg(long)]
    pub no_config: bool,

    /// Show the effective configuration and its sources, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_game_overrides() {
        let cli = Cli::parse_from([
            "byzantine-crew",
            "--seed",
            "7",
            "-r",
            "3",
            "--honest",
            "5",
            "--adversarial",
            "1",
            "-o",
            "json",
            "-vv",
        ]);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.rounds, Some(3));
        assert_eq!(cli.honest, Some(5));
        assert_eq!(cli.adversarial, Some(1));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(cli.provider.is_none());
    }

    #[test]
    fn test_parse_provider() {
        let cli = Cli::parse_from(["byzantine-crew", "-p", "command", "--command", "cat"]);
        assert_eq!(cli.provider, Some(ProviderChoice::Command));
        assert_eq!(cli.command.as_deref(), Some("cat"));
        assert!(cli.output.is_none());
    }
}
