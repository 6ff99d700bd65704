//! Watch command
//!
//! Starts a run and renders every view the controller publishes until the
//! run finishes or the user interrupts.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use pipewatch_monitor::{ControllerState, MonitorConfig, PipelineController, PipelineView};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::backend_client;
use crate::render;

/// Start a run for `repo_url` and follow it
pub async fn watch_run(config: &MonitorConfig, repo_url: &str, json: bool) -> Result<()> {
    let backend = Arc::new(backend_client(config)?);
    let mut controller = PipelineController::new(backend, config.clone());

    let renderer = tokio::spawn(render_views(controller.subscribe(), json));

    controller
        .start_pipeline(repo_url)
        .await
        .context("Failed to start pipeline run")?;
    info!("Watching run for {}", repo_url);

    let interrupted = tokio::select! {
        _ = controller.run_until_finished() => false,
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!("Failed to listen for interrupt: {}", e);
            }
            true
        }
    };

    let final_state = controller.state();
    if interrupted {
        controller.reset();
    }

    // Dropping the controller closes the view channel and ends the renderer
    drop(controller);
    if let Err(e) = renderer.await {
        warn!("Renderer task failed: {}", e);
    }

    if !json {
        if interrupted {
            println!("{}", "Interrupted; stopped watching.".yellow());
        } else if final_state == ControllerState::Finished {
            println!("{}", "Run finished.".green().bold());
        }
    }

    Ok(())
}

async fn render_views(mut views: watch::Receiver<PipelineView>, json: bool) {
    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();
        if view.state == ControllerState::Idle {
            continue;
        }

        if json {
            match serde_json::to_string(&view) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to serialize view: {}", e),
            }
        } else {
            render::print_view(&view);
        }
    }
}
