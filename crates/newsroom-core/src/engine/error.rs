//! Error types for workflow construction and execution.

use newsroom_types::error::CollaboratorError;
use thiserror::Error;

/// Errors surfaced while building or running a workflow.
///
/// Configuration errors (`Config`, `DuplicateConsumer`, `UnconsumedEmit`)
/// are caught at build time. The remaining variants arise during a run and
/// cause the run to finish in the failed state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The workflow definition is invalid.
    #[error("workflow configuration error: {0}")]
    Config(String),

    /// Two steps both claim the same input event kind.
    #[error("event kind '{kind}' is consumed by both '{first}' and '{second}'")]
    DuplicateConsumer {
        kind: &'static str,
        first: &'static str,
        second: &'static str,
    },

    /// A step declares an output kind that no step consumes.
    #[error("step '{step}' emits '{kind}', which no registered step consumes")]
    UnconsumedEmit {
        step: &'static str,
        kind: &'static str,
    },

    /// An event was dispatched whose kind has no registered consumer.
    #[error("no registered step consumes event kind '{kind}'")]
    UnroutedEvent { kind: &'static str },

    /// An event arrived at a join point that already fired.
    #[error("join '{join_point}' received an event after firing")]
    JoinOverflow { join_point: String },

    /// Two arrivals at the same join point disagreed on the expected count.
    #[error(
        "join '{join_point}' was opened expecting {declared} events but a \
         later arrival expected {requested}"
    )]
    JoinCountMismatch {
        join_point: String,
        declared: usize,
        requested: usize,
    },

    /// A join point was given an expected count of zero.
    #[error("join '{join_point}' requires an expected count of at least 1")]
    JoinCountInvalid { join_point: String },

    /// A required context key was never written.
    #[error("run context key '{key}' is missing")]
    ContextMissing { key: String },

    /// A context value failed to serialize or deserialize.
    #[error("run context key '{key}' could not be encoded or decoded: {message}")]
    ContextCodec { key: String, message: String },

    /// No events are queued and no invocations are running, but no terminal
    /// event was produced.
    #[error("workflow stalled: no work in flight and no terminal event produced")]
    Stalled,

    /// A step invocation panicked or was torn down by the runtime.
    #[error("step invocation aborted: {0}")]
    StepPanicked(String),

    /// An external collaborator call failed inside a step.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}
