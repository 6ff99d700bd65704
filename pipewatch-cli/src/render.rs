//! Terminal rendering
//!
//! Prints pipeline views and sub-feed states.

use colored::*;
use pipewatch_core::domain::execution::PipelineExecution;
use pipewatch_core::domain::source::SourceKind;
use pipewatch_core::domain::step::StepStatus;
use pipewatch_core::domain::subfeed::{SubFeedPayload, SubFeedState, SubFeedStatus};
use pipewatch_monitor::{ControllerState, PipelineView, SourceErrors};

/// Print the full view published by the controller
pub fn print_view(view: &PipelineView) {
    println!("{}", "─".repeat(80).dimmed());
    println!("{} {}", "Controller:".bold(), colorize_controller_state(view.state));

    match &view.execution {
        Some(execution) => print_execution(execution),
        None => println!("  {}", "No run tracked.".yellow()),
    }

    print_errors(&view.errors);
}

/// Print an execution: run metadata, steps, then both sub-feeds
pub fn print_execution(execution: &PipelineExecution) {
    println!(
        "  Execution: {}",
        execution
            .execution_id
            .as_deref()
            .unwrap_or("(unassigned)")
            .cyan()
    );
    if !execution.repo_url.is_empty() {
        println!("  Repo:      {}", execution.repo_url.dimmed());
    }
    println!(
        "  Active:    {}",
        if execution.is_active {
            "yes".green()
        } else {
            "no".dimmed()
        }
    );
    println!();

    println!("{}", "Steps:".bold());
    for step in &execution.steps {
        println!(
            "  {} {:<10} {:<12} {}",
            "▸".cyan(),
            step.id,
            colorize_step_status(step.status),
            step.name.dimmed()
        );
    }
    println!();

    print_sub_feed(SourceKind::AgentExecution, &execution.agent_execution);
    print_sub_feed(SourceKind::Report, &execution.report);
}

/// Print one sub-feed state with its payload when terminal
pub fn print_sub_feed(kind: SourceKind, state: &SubFeedState) {
    println!("{} {}", format!("{}:", feed_title(kind)).bold(), colorize_feed_status(state.status()));

    match state.payload() {
        Some(SubFeedPayload::Agent(outcome)) => {
            if let Some(branch) = &outcome.branch {
                println!("  Branch: {}", branch.cyan());
            }
            if let Some(output) = &outcome.output {
                println!("  Output:");
                for line in output.lines() {
                    println!("    {}", line);
                }
            }
            if let Some(error) = &outcome.error {
                println!("  Error:  {}", error.red());
            }
        }
        Some(SubFeedPayload::Report(document)) => {
            if let Some(created_at) = document.created_at {
                println!(
                    "  Created: {}",
                    created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
                );
            }
            println!();
            for line in document.report.lines() {
                println!("  {}", line);
            }
        }
        None => {}
    }
    println!();
}

fn print_errors(errors: &SourceErrors) {
    if errors.is_empty() {
        return;
    }

    println!("{}", "Errors:".bold().red());
    for kind in [SourceKind::Workflow, SourceKind::AgentExecution, SourceKind::Report] {
        if let Some(message) = errors.get(kind) {
            println!("  {} {}: {}", "▸".red(), kind, message);
        }
    }
}

fn feed_title(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Workflow => "Workflow",
        SourceKind::AgentExecution => "Agent execution",
        SourceKind::Report => "Report",
    }
}

fn colorize_step_status(status: StepStatus) -> ColoredString {
    let status_str = status.as_str();
    match status {
        StepStatus::Pending => status_str.dimmed(),
        StepStatus::InProgress => status_str.cyan(),
        StepStatus::NeedsHelp => status_str.yellow(),
        StepStatus::Failed => status_str.red(),
        StepStatus::Completed => status_str.green(),
    }
}

fn colorize_feed_status(status: SubFeedStatus) -> ColoredString {
    let status_str = status.as_str();
    match status {
        SubFeedStatus::NotStarted => status_str.dimmed(),
        SubFeedStatus::Pending => status_str.yellow(),
        SubFeedStatus::Running => status_str.cyan(),
        SubFeedStatus::Completed => status_str.green(),
        SubFeedStatus::Failed => status_str.red(),
    }
}

fn colorize_controller_state(state: ControllerState) -> ColoredString {
    let state_str = state.to_string();
    match state {
        ControllerState::Idle => state_str.dimmed(),
        ControllerState::Starting => state_str.yellow(),
        ControllerState::Running => state_str.cyan(),
        ControllerState::Finished => state_str.green(),
    }
}
