//! Pipewatch CLI
//!
//! Command-line interface for watching repair pipeline runs.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "pipewatch=info,pipewatch_monitor=info";

#[derive(Parser)]
#[command(name = "pipewatch")]
#[command(about = "Watch pipeline runs reported by independent status feeds", long_about = None)]
struct Cli {
    /// Backend URL (overrides the environment configuration)
    #[arg(long, env = "PIPEWATCH_BACKEND_URL")]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.backend_url)?;

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_is_valid() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.contains("pipewatch_monitor=info"));
    }

    #[test]
    fn test_cli_parses_watch_command() {
        let cli = Cli::try_parse_from([
            "pipewatch",
            "--backend-url",
            "http://localhost:9000",
            "watch",
            "https://example/repo",
        ])
        .unwrap();

        assert_eq!(cli.backend_url.as_deref(), Some("http://localhost:9000"));
        assert!(matches!(cli.command, Commands::Watch { json: false, .. }));
    }
}
