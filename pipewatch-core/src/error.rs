//! Error types for core domain validation

use thiserror::Error;

/// Errors raised when building a [`PipelineDefinition`](crate::domain::definition::PipelineDefinition)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// A definition must contain at least one step
    #[error("pipeline definition has no steps")]
    Empty,

    /// Two steps share the same id
    #[error("duplicate step id: {0}")]
    DuplicateStep(String),

    /// A designated step (agent-fix or report-generation) is not part of the definition
    #[error("designated step '{0}' is not defined")]
    UnknownDesignatedStep(String),
}
