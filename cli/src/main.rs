//! CLI entrypoint for synapse
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use synapse_application::{BrainRegistry, Coordinator};
use synapse_domain::RequestContext;
use synapse_infrastructure::{
    ConfigLoader, FileConfig, JsonlLearningLog, register_configured_brains,
};
use synapse_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match init_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging based on verbosity level.
///
/// Logs go to stderr unless `--log-file` is given. The returned guard
/// flushes the file writer on drop.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("could not create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

async fn run(cli: Cli) -> Result<()> {
    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    info!("Starting synapse");

    // === Configuration ===
    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    config.validate().context("invalid configuration")?;

    let mut coordinator_config = config.to_coordinator_config()?;
    if let Some(pattern) = cli.pattern {
        coordinator_config.pattern_override = Some(pattern.into());
    }
    let orchestrator_config = config.to_orchestrator_config()?;

    // === Dependency Injection ===
    let registry = Arc::new(BrainRegistry::new());
    let ids = register_configured_brains(&registry, &config)
        .await
        .context("failed to register brains")?;
    info!("Registered {} brains: {}", ids.len(), ids.join(", "));

    let cancellation = CancellationToken::new();
    let mut coordinator = Coordinator::new(Arc::clone(&registry))
        .with_config(coordinator_config)
        .with_orchestrator_config(orchestrator_config)
        .with_cancellation(cancellation.clone());

    if config.learning.enabled {
        match config
            .learning
            .resolved_path()
            .and_then(JsonlLearningLog::new)
        {
            Some(log) => {
                info!("Recording learning feedback to {}", log.path().display());
                coordinator = coordinator.with_learning(Arc::new(log));
            }
            None => warn!("Learning log unavailable; feedback will not be recorded"),
        }
    }

    if cli.status {
        println!("{}", ConsoleFormatter::format_status(&coordinator.status()));
        return Ok(());
    }

    let question = match cli.question {
        Some(q) if !q.trim().is_empty() => q,
        _ => bail!("A request is required. Use --status to inspect the registered brains."),
    };

    let context = cli
        .env
        .as_ref()
        .map(|env| RequestContext::new().with_environment(env.clone()));

    let shutdown = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling the round");
            shutdown.cancel();
        }
    });

    // Execute with or without progress reporting
    let show_progress = !cli.quiet && cli.output != OutputFormat::Json;
    let result = if show_progress {
        let progress = ProgressReporter::new();
        coordinator
            .submit_with_progress(&question, context, &progress)
            .await
    } else {
        coordinator.submit(&question, context).await
    };

    println!("{}", ConsoleFormatter::render(&result, cli.output));

    Ok(())
}
