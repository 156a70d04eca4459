//! The step contract and the per-invocation handle steps run with.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use newsroom_types::progress::ProgressEvent;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::progress::ProgressBus;

use super::context::RunContext;
use super::error::EngineError;
use super::event::RunEvent;
use super::join::JoinLedger;

/// One unit of work in a workflow.
///
/// A step declares which event kinds it consumes and which it may emit;
/// the builder validates both against the rest of the workflow. `handle`
/// is invoked once per routed event, with at most [`Step::workers`]
/// invocations of the same step running concurrently.
///
/// Events returned from `handle` are emitted on the step's behalf after it
/// completes; a step can also emit mid-flight through [`StepContext::emit`].
pub trait Step<E: RunEvent>: Send + Sync + 'static {
    /// Stable name, used for logging, progress events, and join scoping.
    fn name(&self) -> &'static str;

    /// Event kinds this step consumes. Must be non-empty and disjoint from
    /// every other step's.
    fn accepts(&self) -> &'static [&'static str];

    /// Event kinds this step may emit, including the terminal kind if it
    /// can finish the run.
    fn emits(&self) -> &'static [&'static str];

    /// Maximum concurrent invocations of this step. Defaults to one.
    fn workers(&self) -> usize {
        1
    }

    /// Process one event.
    fn handle(
        &self,
        event: E,
        ctx: StepContext<E>,
    ) -> impl Future<Output = Result<Vec<E>, EngineError>> + Send;
}

/// Object-safe version of [`Step`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn StepDyn`).
/// A blanket implementation is provided for all types implementing `Step`.
pub trait StepDyn<E: RunEvent>: Send + Sync {
    fn name(&self) -> &'static str;

    fn accepts(&self) -> &'static [&'static str];

    fn emits(&self) -> &'static [&'static str];

    fn workers(&self) -> usize;

    fn handle_boxed<'a>(
        &'a self,
        event: E,
        ctx: StepContext<E>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<E>, EngineError>> + Send + 'a>>;
}

/// Blanket implementation: any `Step` automatically implements `StepDyn`.
impl<E: RunEvent, T: Step<E>> StepDyn<E> for T {
    fn name(&self) -> &'static str {
        Step::name(self)
    }

    fn accepts(&self) -> &'static [&'static str] {
        Step::accepts(self)
    }

    fn emits(&self) -> &'static [&'static str] {
        Step::emits(self)
    }

    fn workers(&self) -> usize {
        Step::workers(self)
    }

    fn handle_boxed<'a>(
        &'a self,
        event: E,
        ctx: StepContext<E>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<E>, EngineError>> + Send + 'a>> {
        Box::pin(self.handle(event, ctx))
    }
}

/// Type-erased step, so workflows can hold heterogeneous step types.
///
/// Since `Step` uses RPITIT, it cannot be used as a trait object directly.
/// `BoxStep` provides equivalent methods that delegate to the inner
/// `StepDyn` trait object.
pub struct BoxStep<E: RunEvent> {
    inner: Box<dyn StepDyn<E> + Send + Sync>,
}

impl<E: RunEvent> BoxStep<E> {
    /// Wrap a concrete `Step` in a type-erased box.
    pub fn new<T: Step<E> + 'static>(step: T) -> Self {
        Self {
            inner: Box::new(step),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    pub fn accepts(&self) -> &'static [&'static str] {
        self.inner.accepts()
    }

    pub fn emits(&self) -> &'static [&'static str] {
        self.inner.emits()
    }

    pub fn workers(&self) -> usize {
        self.inner.workers()
    }

    /// Process one event through the wrapped step.
    pub async fn handle(&self, event: E, ctx: StepContext<E>) -> Result<Vec<E>, EngineError> {
        self.inner.handle_boxed(event, ctx).await
    }
}

impl<E: RunEvent> std::fmt::Debug for BoxStep<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxStep")
            .field("name", &self.inner.name())
            .field("workers", &self.inner.workers())
            .finish()
    }
}

/// Handle given to each step invocation.
///
/// Carries the run-scoped context store, the join ledger, and the event
/// queue. Cloning is cheap; everything inside is shared with the run.
#[derive(Debug, Clone)]
pub struct StepContext<E: RunEvent> {
    run_id: Uuid,
    step: &'static str,
    store: Arc<RunContext>,
    joins: Arc<JoinLedger<E>>,
    queue: mpsc::UnboundedSender<E>,
    in_flight: Arc<AtomicUsize>,
    progress: ProgressBus,
}

impl<E: RunEvent> StepContext<E> {
    pub(crate) fn new(
        run_id: Uuid,
        step: &'static str,
        store: Arc<RunContext>,
        joins: Arc<JoinLedger<E>>,
        queue: mpsc::UnboundedSender<E>,
        in_flight: Arc<AtomicUsize>,
        progress: ProgressBus,
    ) -> Self {
        Self {
            run_id,
            step,
            store,
            joins,
            queue,
            in_flight,
            progress,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Name of the step this invocation belongs to.
    pub fn step(&self) -> &'static str {
        self.step
    }

    /// Write a value into the run's context store.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), EngineError> {
        self.store.set(key, value)
    }

    /// Read a value from the run's context store.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, EngineError> {
        self.store.get(key)
    }

    /// Read a value that must already be present.
    pub fn get_required<T: DeserializeOwned>(&self, key: &str) -> Result<T, EngineError> {
        self.store.get_required(key)
    }

    /// Emit an event into the run, fire-and-forget.
    ///
    /// The event is counted as in-flight before it is queued, so the run
    /// cannot be declared quiescent between the emit and its dispatch. An
    /// emit after the run has terminated is dropped.
    pub fn emit(&self, event: E) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if self.queue.send(event).is_err() {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            tracing::trace!(
                run_id = %self.run_id,
                step = self.step,
                "emit after run terminated, event dropped"
            );
        }
    }

    /// Record one arrival at this step's join point.
    ///
    /// Returns the full batch, in arrival order, on the arrival that
    /// completes the join; `None` while the join is still filling.
    pub fn collect(&self, event: E, expected: usize) -> Result<Option<Vec<E>>, EngineError> {
        self.joins.collect(self.step, event, expected)
    }

    /// Publish a human-readable stage update for this run.
    pub fn update(&self, message: impl Into<String>) {
        self.progress.publish(ProgressEvent::StageUpdate {
            run_id: self.run_id,
            message: message.into(),
        });
    }

    /// Mark this invocation's consumed event as settled.
    pub(crate) fn settle(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
