//! Interceptor command-line entry point.
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use client_bootstrap::InterceptorConfig;
use client_cli::Replay;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Response interception tools
#[derive(Parser)]
#[command(name = "interceptor")]
#[command(about = "Run captured exchanges through the interception pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Replay a capture file through the pipeline
    Replay(Replay),
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = InterceptorConfig::from_env()?;

    let _guard = setup_logging(config.log_dir.as_deref())?;

    match cli.command {
        Command::Replay(cmd) => cmd.execute(config),
    }
}

/// Logs to stderr, and additionally to `<log_dir>/interceptor.log` when set.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, "interceptor.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!("Log file: {}/interceptor.log", dir.display());
    }

    Ok(guard)
}
