//! In-memory backend for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;
use pipewatch_core::domain::step::StepStatus;
use pipewatch_core::dto::agent::AgentExecutionSnapshot;
use pipewatch_core::dto::report::ReportSnapshot;
use pipewatch_core::dto::workflow::{StepReport, WorkflowSnapshot};

use crate::source::{SourceError, StatusBackend};

pub(crate) type Scripted<T> = Result<T, SourceError>;

/// Responses for one feed, served in order; the last one is repeated
struct Feed<T> {
    queue: VecDeque<Scripted<T>>,
    last: Option<Scripted<T>>,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            last: None,
        }
    }
}

impl<T: Clone> Feed<T> {
    fn next(&mut self, empty: Scripted<T>) -> Scripted<T> {
        if let Some(response) = self.queue.pop_front() {
            self.last = Some(clone_scripted(&response));
            return response;
        }
        match &self.last {
            Some(response) => clone_scripted(response),
            None => empty,
        }
    }
}

/// Backend replaying scripted responses
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    workflow: Mutex<Feed<WorkflowSnapshot>>,
    workflow_gate: Mutex<Option<Arc<Notify>>>,
    agent: Mutex<Feed<Option<AgentExecutionSnapshot>>>,
    report: Mutex<Feed<Option<ReportSnapshot>>>,
    start_run: Mutex<Option<Scripted<String>>>,
    workflow_fetches: AtomicUsize,
    agent_fetches: AtomicUsize,
    report_fetches: AtomicUsize,
    agent_ids: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn starting(execution_id: &str) -> Self {
        let backend = Self::new();
        backend.set_start_run(Ok(execution_id.to_string()));
        backend
    }

    pub(crate) fn push_workflow(&self, response: Scripted<WorkflowSnapshot>) {
        self.workflow.lock().unwrap().queue.push_back(response);
    }

    /// Holds the next workflow fetch until the returned gate is notified
    ///
    /// The held fetch takes its response from the queue before blocking.
    pub(crate) fn hold_next_workflow(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.workflow_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub(crate) fn push_agent(&self, response: Scripted<Option<AgentExecutionSnapshot>>) {
        self.agent.lock().unwrap().queue.push_back(response);
    }

    pub(crate) fn push_report(&self, response: Scripted<Option<ReportSnapshot>>) {
        self.report.lock().unwrap().queue.push_back(response);
    }

    pub(crate) fn set_start_run(&self, response: Scripted<String>) {
        *self.start_run.lock().unwrap() = Some(response);
    }

    pub(crate) fn workflow_fetches(&self) -> usize {
        self.workflow_fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn agent_fetches(&self) -> usize {
        self.agent_fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn report_fetches(&self) -> usize {
        self.report_fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn agent_ids(&self) -> Vec<String> {
        self.agent_ids.lock().unwrap().clone()
    }
}

fn clone_scripted<T: Clone>(response: &Scripted<T>) -> Scripted<T> {
    match response {
        Ok(value) => Ok(value.clone()),
        Err(err) => Err(clone_error(err)),
    }
}

fn clone_error(err: &SourceError) -> SourceError {
    match err {
        SourceError::Transport(m) => SourceError::Transport(m.clone()),
        SourceError::Backend { status, message } => SourceError::Backend {
            status: *status,
            message: message.clone(),
        },
        SourceError::Malformed(m) => SourceError::Malformed(m.clone()),
    }
}

#[async_trait]
impl StatusBackend for ScriptedBackend {
    async fn workflow_status(&self) -> Result<WorkflowSnapshot, SourceError> {
        self.workflow_fetches.fetch_add(1, Ordering::SeqCst);
        let response = self
            .workflow
            .lock()
            .unwrap()
            .next(Err(SourceError::Transport("no workflow scripted".to_string())));

        let gate = self.workflow_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        response
    }

    async fn agent_execution_status(
        &self,
        execution_id: &str,
    ) -> Result<Option<AgentExecutionSnapshot>, SourceError> {
        self.agent_fetches.fetch_add(1, Ordering::SeqCst);
        self.agent_ids.lock().unwrap().push(execution_id.to_string());
        self.agent.lock().unwrap().next(Ok(None))
    }

    async fn report(&self, _execution_id: &str) -> Result<Option<ReportSnapshot>, SourceError> {
        self.report_fetches.fetch_add(1, Ordering::SeqCst);
        self.report.lock().unwrap().next(Ok(None))
    }

    async fn start_run(&self, _repo_url: &str) -> Result<String, SourceError> {
        match self.start_run.lock().unwrap().as_ref() {
            Some(Ok(id)) => Ok(id.clone()),
            Some(Err(err)) => Err(clone_error(err)),
            None => Err(SourceError::Transport("no start_run scripted".to_string())),
        }
    }
}

/// Workflow snapshot with the given step statuses
pub(crate) fn workflow(
    execution_id: Option<&str>,
    is_active: bool,
    steps: &[(&str, StepStatus)],
) -> WorkflowSnapshot {
    WorkflowSnapshot {
        execution_id: execution_id.map(str::to_string),
        repo_url: "https://example/repo".to_string(),
        is_active,
        steps: steps
            .iter()
            .map(|(id, status)| StepReport {
                id: id.to_string(),
                status: *status,
            })
            .collect(),
    }
}
