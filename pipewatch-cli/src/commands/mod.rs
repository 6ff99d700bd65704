//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod feed;
mod watch;

use anyhow::Result;
use clap::Subcommand;
use pipewatch_monitor::MonitorConfig;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start a run and follow it until the backend reports it finished
    Watch {
        /// Repository to run the pipeline against
        repo_url: String,

        /// Print each view as a JSON line instead of rendering it
        #[arg(long)]
        json: bool,
    },
    /// Show the current workflow status once
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show the agent execution status for a run
    Agent {
        /// Execution ID returned when the run was started
        execution_id: String,

        #[arg(long)]
        json: bool,
    },
    /// Show the report for a run
    Report {
        /// Execution ID returned when the run was started
        execution_id: String,

        #[arg(long)]
        json: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The monitor configuration
pub async fn handle_command(command: Commands, config: &MonitorConfig) -> Result<()> {
    match command {
        Commands::Watch { repo_url, json } => watch::watch_run(config, &repo_url, json).await,
        Commands::Status { json } => feed::show_workflow_status(config, json).await,
        Commands::Agent { execution_id, json } => {
            feed::show_agent_execution(config, &execution_id, json).await
        }
        Commands::Report { execution_id, json } => {
            feed::show_report(config, &execution_id, json).await
        }
    }
}
