//! One-shot feed commands
//!
//! Fetch a single snapshot from one feed and print it.

use anyhow::{Context, Result};
use colored::*;
use pipewatch_core::domain::definition::PipelineDefinition;
use pipewatch_core::domain::source::SourceKind;
use pipewatch_core::domain::subfeed::SubFeedState;
use pipewatch_monitor::{MonitorConfig, SourceUpdate, reconcile};

use crate::config::backend_client;
use crate::render;

/// Show the workflow snapshot laid over the default pipeline
pub async fn show_workflow_status(config: &MonitorConfig, json: bool) -> Result<()> {
    let client = backend_client(config)?;
    let snapshot = client
        .get_workflow_status()
        .await
        .context("Failed to fetch workflow status")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let definition = PipelineDefinition::default();
    let execution = reconcile(&definition, None, &SourceUpdate::Workflow(snapshot));
    render::print_execution(&execution);
    Ok(())
}

/// Show the agent execution feed for a run
pub async fn show_agent_execution(
    config: &MonitorConfig,
    execution_id: &str,
    json: bool,
) -> Result<()> {
    let client = backend_client(config)?;
    let state = client
        .get_agent_execution_status(execution_id)
        .await
        .context("Failed to fetch agent execution status")?
        .map(|snapshot| snapshot.into_state())
        .unwrap_or_else(SubFeedState::not_started);

    print_state(SourceKind::AgentExecution, &state, json)
}

/// Show the report feed for a run
pub async fn show_report(config: &MonitorConfig, execution_id: &str, json: bool) -> Result<()> {
    let client = backend_client(config)?;
    let state = client
        .get_report(execution_id)
        .await
        .context("Failed to fetch report")?
        .map(|snapshot| snapshot.into_state())
        .unwrap_or_else(SubFeedState::not_started);

    print_state(SourceKind::Report, &state, json)
}

fn print_state(kind: SourceKind, state: &SubFeedState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }

    if !state.status().is_terminal() {
        println!("{}", format!("No final {} result yet.", kind).yellow());
        println!();
    }
    render::print_sub_feed(kind, state);
    Ok(())
}
