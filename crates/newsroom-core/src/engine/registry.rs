//! Workflow definition and build-time validation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::progress::ProgressBus;

use super::error::EngineError;
use super::event::RunEvent;
use super::step::{BoxStep, Step};

/// A step plus the semaphore that bounds its concurrent invocations.
pub(crate) struct RegisteredStep<E: RunEvent> {
    pub(crate) step: BoxStep<E>,
    pub(crate) semaphore: Arc<Semaphore>,
}

impl<E: RunEvent> RegisteredStep<E> {
    pub(crate) fn name(&self) -> &'static str {
        self.step.name()
    }
}

/// A validated, runnable workflow definition.
///
/// Built through [`WorkflowBuilder`], which checks the step graph before
/// any run starts: every event kind has at most one consumer, every
/// declared output kind has a consumer (or is the terminal kind), and
/// every step has at least one worker. A `Workflow` is immutable once
/// built and can execute any number of runs.
pub struct Workflow<E: RunEvent> {
    pub(crate) steps: Vec<Arc<RegisteredStep<E>>>,
    pub(crate) route: HashMap<&'static str, usize>,
    pub(crate) progress: ProgressBus,
}

impl<E: RunEvent> Workflow<E> {
    pub fn builder() -> WorkflowBuilder<E> {
        WorkflowBuilder::new()
    }

    /// Names of the registered steps, in registration order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// The bus this workflow publishes progress events on.
    pub fn progress(&self) -> &ProgressBus {
        &self.progress
    }
}

impl<E: RunEvent> std::fmt::Debug for Workflow<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("steps", &self.step_names())
            .finish()
    }
}

/// Builder collecting steps before validation.
pub struct WorkflowBuilder<E: RunEvent> {
    steps: Vec<BoxStep<E>>,
    progress: Option<ProgressBus>,
}

impl<E: RunEvent> WorkflowBuilder<E> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            progress: None,
        }
    }

    /// Register a step. Registration order is preserved but carries no
    /// routing meaning; routing is purely by event kind.
    pub fn step<S: Step<E> + 'static>(mut self, step: S) -> Self {
        self.steps.push(BoxStep::new(step));
        self
    }

    /// Publish progress on an existing bus instead of a private one.
    pub fn progress(mut self, bus: ProgressBus) -> Self {
        self.progress = Some(bus);
        self
    }

    /// Validate the step graph and produce a runnable workflow.
    pub fn build(self) -> Result<Workflow<E>, EngineError> {
        if self.steps.is_empty() {
            return Err(EngineError::Config("workflow has no steps".to_string()));
        }

        let mut route: HashMap<&'static str, usize> = HashMap::new();
        let mut names: HashSet<&'static str> = HashSet::new();

        for (index, step) in self.steps.iter().enumerate() {
            let name = step.name();
            if !names.insert(name) {
                return Err(EngineError::Config(format!(
                    "two steps are registered under the name '{name}'"
                )));
            }
            if step.workers() == 0 {
                return Err(EngineError::Config(format!(
                    "step '{name}' declares zero workers"
                )));
            }
            if step.accepts().is_empty() {
                return Err(EngineError::Config(format!(
                    "step '{name}' consumes no event kinds"
                )));
            }
            for &kind in step.accepts() {
                if kind == E::STOP {
                    return Err(EngineError::Config(format!(
                        "step '{name}' consumes the terminal kind '{kind}'; terminal \
                         events are routed by the engine, never to a step"
                    )));
                }
                if let Some(&owner) = route.get(kind) {
                    return Err(EngineError::DuplicateConsumer {
                        kind,
                        first: self.steps[owner].name(),
                        second: name,
                    });
                }
                route.insert(kind, index);
            }
        }

        // With the routing table complete, every declared output must have
        // somewhere to go.
        for step in &self.steps {
            for &kind in step.emits() {
                if kind != E::STOP && !route.contains_key(kind) {
                    return Err(EngineError::UnconsumedEmit {
                        step: step.name(),
                        kind,
                    });
                }
            }
        }

        let steps = self
            .steps
            .into_iter()
            .map(|step| {
                let workers = step.workers();
                Arc::new(RegisteredStep {
                    step,
                    semaphore: Arc::new(Semaphore::new(workers)),
                })
            })
            .collect();

        Ok(Workflow {
            steps,
            route,
            progress: self.progress.unwrap_or_default(),
        })
    }
}

impl<E: RunEvent> Default for WorkflowBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
