//! Pipeline controller
//!
//! Owns the lifecycle of one observed run:
//!
//! ```text
//! idle ──start_pipeline──▶ starting ──run accepted──▶ running ──is_active=false──▶ finished
//!   ▲                          │                                                      │
//!   └──────── start failed ────┘◀──────────────── reset / start_pipeline ─────────────┘
//! ```
//!
//! Pollers deliver their results as events on a channel. The controller
//! consumes that channel from a single task, reconciles each event into a new
//! [`PipelineExecution`] value and publishes the result to observers. Every
//! event carries the generation of the run it was issued for; events from an
//! earlier run are dropped.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use pipewatch_core::domain::definition::PipelineDefinition;
use pipewatch_core::domain::execution::PipelineExecution;
use pipewatch_core::domain::source::SourceKind;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::reconciler::{SourceUpdate, reconcile};
use crate::scheduler::Poller;
use crate::source::{
    AgentExecutionSource, ReportSource, SourceError, StatusBackend, StatusSource, WorkflowSource,
};

/// Lifecycle state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    /// No execution tracked
    Idle,
    /// Run requested, execution id not assigned yet
    Starting,
    /// Workflow poller active
    Running,
    /// The backend reported the run as finished; nothing is polled anymore
    Finished,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerState::Idle => "idle",
            ControllerState::Starting => "starting",
            ControllerState::Running => "running",
            ControllerState::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Most recent error per source, cleared by the next successful fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceErrors {
    pub workflow: Option<String>,
    pub agent_execution: Option<String>,
    pub report: Option<String>,
}

impl SourceErrors {
    pub fn get(&self, kind: SourceKind) -> Option<&str> {
        match kind {
            SourceKind::Workflow => self.workflow.as_deref(),
            SourceKind::AgentExecution => self.agent_execution.as_deref(),
            SourceKind::Report => self.report.as_deref(),
        }
    }

    fn slot_mut(&mut self, kind: SourceKind) -> &mut Option<String> {
        match kind {
            SourceKind::Workflow => &mut self.workflow,
            SourceKind::AgentExecution => &mut self.agent_execution,
            SourceKind::Report => &mut self.report,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.workflow.is_none() && self.agent_execution.is_none() && self.report.is_none()
    }
}

/// What observers receive after every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineView {
    pub state: ControllerState,
    pub execution: Option<PipelineExecution>,
    pub errors: SourceErrors,
}

impl PipelineView {
    fn idle() -> Self {
        Self {
            state: ControllerState::Idle,
            execution: None,
            errors: SourceErrors::default(),
        }
    }
}

/// Errors returned by controller operations
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The backend refused or failed to start the run
    #[error("failed to start run: {0}")]
    StartRun(#[source] SourceError),
}

#[derive(Debug)]
enum EventPayload {
    Update(SourceUpdate),
    Failure { kind: SourceKind, message: String },
}

#[derive(Debug)]
struct ControllerEvent {
    generation: u64,
    payload: EventPayload,
}

/// Controller for one observed pipeline run at a time
pub struct PipelineController {
    backend: Arc<dyn StatusBackend>,
    config: MonitorConfig,
    definition: PipelineDefinition,
    state: ControllerState,
    /// Bumped on every reset; tags events so stale ones can be dropped
    generation: u64,
    execution: Option<PipelineExecution>,
    errors: SourceErrors,
    workflow_poller: Option<Poller<WorkflowSource>>,
    agent_poller: Option<Poller<AgentExecutionSource>>,
    report_poller: Option<Poller<ReportSource>>,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    view_tx: watch::Sender<PipelineView>,
}

impl PipelineController {
    /// Creates an idle controller using the default pipeline definition
    pub fn new(backend: Arc<dyn StatusBackend>, config: MonitorConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, _) = watch::channel(PipelineView::idle());

        Self {
            backend,
            config,
            definition: PipelineDefinition::default(),
            state: ControllerState::Idle,
            generation: 0,
            execution: None,
            errors: SourceErrors::default(),
            workflow_poller: None,
            agent_poller: None,
            report_poller: None,
            events_tx,
            events_rx,
            view_tx,
        }
    }

    /// Replaces the pipeline definition; takes effect from the next run
    pub fn with_definition(mut self, definition: PipelineDefinition) -> Self {
        self.definition = definition;
        self
    }

    // =============================================================================
    // Observation
    // =============================================================================

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn execution(&self) -> Option<&PipelineExecution> {
        self.execution.as_ref()
    }

    pub fn errors(&self) -> &SourceErrors {
        &self.errors
    }

    pub fn definition(&self) -> &PipelineDefinition {
        &self.definition
    }

    /// Current view, as last published
    pub fn view(&self) -> PipelineView {
        self.view_tx.borrow().clone()
    }

    /// Subscribes to view changes
    ///
    /// A new view is published only when it differs from the previous one.
    pub fn subscribe(&self) -> watch::Receiver<PipelineView> {
        self.view_tx.subscribe()
    }

    /// Whether the poller for `kind` has been started for the current run
    pub fn has_started(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Workflow => self.workflow_poller.as_ref().is_some_and(Poller::is_started),
            SourceKind::AgentExecution => self.agent_poller.as_ref().is_some_and(Poller::is_started),
            SourceKind::Report => self.report_poller.as_ref().is_some_and(Poller::is_started),
        }
    }

    /// Whether the poller for `kind` is started and not stopped
    pub fn is_polling(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Workflow => self.workflow_poller.as_ref().is_some_and(Poller::is_active),
            SourceKind::AgentExecution => self.agent_poller.as_ref().is_some_and(Poller::is_active),
            SourceKind::Report => self.report_poller.as_ref().is_some_and(Poller::is_active),
        }
    }

    /// Forces an immediate tick of the poller for `kind`
    ///
    /// # Returns
    /// Whether a fetch was issued
    pub fn force_tick(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Workflow => self.workflow_poller.as_ref().is_some_and(Poller::tick),
            SourceKind::AgentExecution => self.agent_poller.as_ref().is_some_and(Poller::tick),
            SourceKind::Report => self.report_poller.as_ref().is_some_and(Poller::tick),
        }
    }

    // =============================================================================
    // Lifecycle
    // =============================================================================

    /// Starts observing a new run of `repo_url`
    ///
    /// Any run currently tracked is reset first. On success the controller is
    /// `running` and the workflow poller is active.
    pub async fn start_pipeline(&mut self, repo_url: &str) -> Result<(), ControllerError> {
        if self.state != ControllerState::Idle {
            info!("Resetting {} run before starting a new one", self.state);
            self.reset();
        }

        self.state = ControllerState::Starting;
        self.execution = Some(PipelineExecution::new(&self.definition, repo_url, None));
        self.publish();

        info!("Starting pipeline run for {}", repo_url);

        match self.backend.start_run(repo_url).await {
            Ok(execution_id) => {
                let execution_id = Some(execution_id).filter(|id| !id.is_empty());
                info!("Run accepted (execution id: {:?})", execution_id);

                self.execution = self
                    .execution
                    .take()
                    .map(|execution| execution.with_execution_id(execution_id));
                self.state = ControllerState::Running;
                self.start_workflow_poller();
                self.publish();
                Ok(())
            }
            Err(e) => {
                error!("Failed to start run for {}: {}", repo_url, e);
                self.state = ControllerState::Idle;
                self.execution = None;
                self.errors.workflow = Some(e.to_string());
                self.publish();
                Err(ControllerError::StartRun(e))
            }
        }
    }

    /// Stops every poller and forgets the current run
    pub fn reset(&mut self) {
        self.stop_all_pollers();
        self.workflow_poller = None;
        self.agent_poller = None;
        self.report_poller = None;

        self.generation += 1;
        self.state = ControllerState::Idle;
        self.execution = None;
        self.errors = SourceErrors::default();
        self.publish();

        debug!("Controller reset (generation {})", self.generation);
    }

    // =============================================================================
    // Event loop
    // =============================================================================

    /// Waits for the next poller event and applies it
    ///
    /// # Returns
    /// Whether the event changed controller state (stale or late events do not)
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => self.handle_event(event),
            None => false,
        }
    }

    /// Processes events until the run finishes
    ///
    /// Returns immediately when no run is in progress.
    pub async fn run_until_finished(&mut self) {
        while self.state == ControllerState::Running {
            self.process_next().await;
        }
    }

    fn handle_event(&mut self, event: ControllerEvent) -> bool {
        if event.generation != self.generation {
            debug!(
                "Dropping event from generation {} (current {})",
                event.generation, self.generation
            );
            return false;
        }

        if self.state != ControllerState::Running {
            debug!("Dropping event received while {}", self.state);
            return false;
        }

        match event.payload {
            EventPayload::Update(update) => self.apply_update(update),
            EventPayload::Failure { kind, message } => {
                warn!("{} source error: {}", kind, message);
                *self.errors.slot_mut(kind) = Some(message);
                self.publish();
            }
        }

        true
    }

    fn apply_update(&mut self, update: SourceUpdate) {
        let kind = update.kind();
        let next = reconcile(&self.definition, self.execution.as_ref(), &update);
        let finished = kind == SourceKind::Workflow && !next.is_active;

        self.execution = Some(next);
        *self.errors.slot_mut(kind) = None;

        match &update {
            SourceUpdate::AgentExecution(state) if state.is_terminal() => {
                info!("Agent execution reached {}", state.status());
                stop_poller(&self.agent_poller);
            }
            SourceUpdate::Report(state) if state.is_terminal() => {
                info!("Report reached {}", state.status());
                stop_poller(&self.report_poller);
            }
            _ => {}
        }

        if finished {
            self.finish();
        } else {
            self.activate_sub_feeds();
        }

        self.publish();
    }

    fn finish(&mut self) {
        info!("Run is no longer active, stopping all pollers");
        self.stop_all_pollers();
        self.state = ControllerState::Finished;
    }

    // =============================================================================
    // Pollers
    // =============================================================================

    /// Starts sub-feed pollers whose gating step has started work
    ///
    /// A sub-feed poller is started at most once per run and never before the
    /// execution id is known.
    fn activate_sub_feeds(&mut self) {
        let Some(execution) = &self.execution else {
            return;
        };
        let Some(execution_id) = execution.execution_id.clone() else {
            debug!("Execution id not known yet, sub-feeds stay inactive");
            return;
        };

        let gate_open = |step_id: &str| {
            execution
                .step_status(step_id)
                .is_some_and(|status| status.has_started_work())
        };
        let start_agent = self.agent_poller.is_none() && gate_open(self.definition.agent_step());
        let start_report = self.report_poller.is_none() && gate_open(self.definition.report_step());

        if start_agent {
            let source = AgentExecutionSource::new(Arc::clone(&self.backend), &execution_id);
            let interval = self.config.agent_execution.interval();
            self.agent_poller = Some(self.spawn_poller(source, interval, SourceUpdate::AgentExecution));
        }

        if start_report {
            let source = ReportSource::new(Arc::clone(&self.backend), &execution_id);
            let interval = self.config.report.interval();
            self.report_poller = Some(self.spawn_poller(source, interval, SourceUpdate::Report));
        }
    }

    fn start_workflow_poller(&mut self) {
        let source = WorkflowSource::new(Arc::clone(&self.backend));
        let interval = self.config.workflow.interval();
        self.workflow_poller = Some(self.spawn_poller(source, interval, SourceUpdate::Workflow));
    }

    /// Creates and starts a poller whose results are sent to the event
    /// channel, tagged with the current generation
    fn spawn_poller<S, F>(&self, source: S, interval: Duration, wrap: F) -> Poller<S>
    where
        S: StatusSource,
        F: Fn(S::Snapshot) -> SourceUpdate + Send + Sync + 'static,
    {
        let kind = source.kind();
        let generation = self.generation;
        let update_tx = self.events_tx.clone();
        let error_tx = self.events_tx.clone();

        let poller = Poller::new(source);
        poller.start(
            interval,
            move |snapshot| {
                let _ = update_tx.send(ControllerEvent {
                    generation,
                    payload: EventPayload::Update(wrap(snapshot)),
                });
            },
            move |err| {
                let _ = error_tx.send(ControllerEvent {
                    generation,
                    payload: EventPayload::Failure {
                        kind,
                        message: err.to_string(),
                    },
                });
            },
        );

        poller
    }

    fn stop_all_pollers(&self) {
        stop_poller(&self.workflow_poller);
        stop_poller(&self.agent_poller);
        stop_poller(&self.report_poller);
    }

    fn publish(&self) {
        let next = PipelineView {
            state: self.state,
            execution: self.execution.clone(),
            errors: self.errors.clone(),
        };

        self.view_tx.send_if_modified(|view| {
            if *view == next {
                false
            } else {
                *view = next;
                true
            }
        });
    }
}

fn stop_poller<S: StatusSource>(poller: &Option<Poller<S>>) {
    if let Some(poller) = poller {
        poller.stop();
    }
}
