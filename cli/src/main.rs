//! CLI entrypoint for Byzantine Crew
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use crew_application::{
    ExecutionParams, GameLogger, NoGameLogger, RunGameInput, RunGameUseCase,
};
use crew_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, JsonlGameLogger, ProviderKind, RoutingFactory,
    export_stats, game_file_paths,
};
use crew_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressMode, ProviderChoice};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from files (only --config with --no-config)
    let mut config = if cli.no_config {
        ConfigLoader::load_isolated(cli.config.as_deref())
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .context("failed to load configuration")?;
    apply_overrides(&cli, &mut config);

    let log_dir = cli.log_dir.clone().or_else(|| config.output.log_dir.clone());
    let _guard = init_tracing(&cli, log_dir.as_deref().filter(|_| cli.trace_file))?;

    if cli.show_config {
        for source in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("# source: {}", source);
        }
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let (rules, graph) = config.to_game().context("invalid configuration")?;
    let seed = config.game.seed.unwrap_or_else(rand::random);
    info!(seed, "Starting Byzantine Crew");

    // === Dependency Injection ===
    let factory = RoutingFactory::from_config(&config.providers, seed)?;

    let started_at = Utc::now();
    let files = match &log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            Some(game_file_paths(dir, seed, started_at))
        }
        None => None,
    };
    let logger: Arc<dyn GameLogger> = match files
        .as_ref()
        .and_then(|(log_path, _)| JsonlGameLogger::new(log_path))
    {
        Some(logger) => Arc::new(logger),
        None => Arc::new(NoGameLogger),
    };

    // Ctrl-C ends the game at the next decision point
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping the game");
            signal_token.cancel();
        }
    });

    let params = ExecutionParams::default()
        .with_decision_timeout(Some(config.game.decision_timeout()));
    let use_case = RunGameUseCase::new(Arc::new(factory))
        .with_logger(logger)
        .with_params(params)
        .with_cancellation(token);

    let input = RunGameInput::new(rules, graph, seed);

    let progress = ProgressMode::detect(cli.quiet, std::io::stderr().is_terminal())
        .notifier(cli.verbose > 0);
    let result = use_case.execute_with_progress(input, &*progress).await;
    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_cancelled() => bail!("game cancelled"),
        Err(e) => return Err(e.into()),
    };

    if let Some((_, stats_path)) = &files {
        export_stats(&report, stats_path)?;
        info!(path = %stats_path.display(), "Stats exported");
    }

    // Output results
    let output = match output_format(&cli, &config) {
        OutputFormat::Full => ConsoleFormatter::format(&report),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };

    println!("{}", output);

    Ok(())
}

/// Command-line flags win over every configuration file.
fn apply_overrides(cli: &Cli, config: &mut FileConfig) {
    let game = &mut config.game;
    if let Some(seed) = cli.seed {
        game.seed = Some(seed);
    }
    if let Some(rounds) = cli.rounds {
        game.rounds = rounds;
    }
    if let Some(ticks) = cli.ticks {
        game.ticks_per_round = ticks;
    }
    if let Some(honest) = cli.honest {
        game.honest = honest;
    }
    if let Some(adversarial) = cli.adversarial {
        game.adversarial = adversarial;
    }
    if let Some(timeout) = cli.timeout {
        game.decision_timeout_seconds = Some(timeout);
    }

    if let Some(choice) = cli.provider {
        config.providers.kind = match choice {
            ProviderChoice::Heuristic => ProviderKind::Heuristic,
            ProviderChoice::Command => ProviderKind::Command,
        };
        // An explicit provider applies to both factions
        config.providers.adversarial_kind = None;
    }
    if let Some(command) = &cli.command {
        config.providers.command = Some(command.clone());
    }
}

fn output_format(cli: &Cli, config: &FileConfig) -> OutputFormat {
    cli.output.unwrap_or(match config.output.format {
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        Some(FileOutputFormat::Text) | None => OutputFormat::Full,
    })
}

/// Console tracing on stderr, plus a plain-text file when `file_dir` is set.
fn init_tracing(cli: &Cli, file_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file, guard) = match file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, trace_file_name());
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}

fn trace_file_name() -> PathBuf {
    PathBuf::from(format!(
        "byzantine-crew-{}.log",
        Utc::now().format("%Y%m%dT%H%M%S")
    ))
}
