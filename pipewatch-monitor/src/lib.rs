//! Pipewatch Monitor
//!
//! Observes a pipeline run whose status is spread over several independent
//! backend feeds and reconciles them into one view.
//!
//! Architecture:
//! - Configuration: poll cadences and backend URL
//! - Sources: typed accessors for the workflow, agent-execution and report feeds
//! - Scheduler: interval pollers with single-flight fetches
//! - Reconciler: pure merge of one snapshot into the current execution
//! - Controller: run lifecycle, sub-feed activation and observer publishing

pub mod config;
pub mod controller;
pub mod reconciler;
pub mod scheduler;
pub mod source;

#[cfg(test)]
mod testing;

pub use config::{MonitorConfig, PollConfig};
pub use controller::{
    ControllerError, ControllerState, PipelineController, PipelineView, SourceErrors,
};
pub use reconciler::{SourceUpdate, reconcile};
pub use scheduler::Poller;
pub use source::{
    AgentExecutionSource, ReportSource, SourceError, StatusBackend, StatusSource, WorkflowSource,
};
