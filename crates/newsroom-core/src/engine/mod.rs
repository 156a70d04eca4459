//! Generic event-driven workflow engine.
//!
//! A [`Workflow`] is a validated set of steps, each consuming one or more
//! event kinds and emitting zero or more events in response. A single
//! dispatcher task routes events from an internal queue to steps, spawning
//! one invocation per event into a [`tokio::task::JoinSet`]. Per-step
//! concurrency is bounded by semaphores; everything else runs as fast as
//! the runtime allows.
//!
//! A run terminates when a step emits the terminal event kind (see
//! [`RunEvent::STOP`]), when a step fails, when no work remains without a
//! terminal event having been produced (a stall), or when the run-level
//! timeout elapses.

pub mod context;
pub mod error;
pub mod event;
pub mod join;
pub mod registry;
pub mod run;
pub mod step;

pub use context::RunContext;
pub use error::EngineError;
pub use event::RunEvent;
pub use join::JoinLedger;
pub use registry::{Workflow, WorkflowBuilder};
pub use run::{DEFAULT_RUN_TIMEOUT_SECS, RunOutcome, RunReport};
pub use step::{BoxStep, Step, StepContext};
