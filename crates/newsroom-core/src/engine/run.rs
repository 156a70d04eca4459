//! Run execution: the dispatcher loop and run reports.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use newsroom_types::progress::ProgressEvent;
use newsroom_types::run::RunStatus;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::context::RunContext;
use super::error::EngineError;
use super::event::RunEvent;
use super::join::JoinLedger;
use super::registry::Workflow;
use super::step::StepContext;

/// Default run-level timeout (30 minutes).
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 1800;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome<E> {
    /// A step emitted the terminal event; it carries the run's result.
    Completed(E),
    /// A step failed, an event could not be routed, or the run stalled.
    Failed(EngineError),
    /// The run-level timeout elapsed first.
    TimedOut,
}

impl<E> RunOutcome<E> {
    pub fn status(&self) -> RunStatus {
        match self {
            RunOutcome::Completed(_) => RunStatus::Completed,
            RunOutcome::Failed(_) => RunStatus::Failed,
            RunOutcome::TimedOut => RunStatus::TimedOut,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// Summary of one finished run.
#[derive(Debug)]
pub struct RunReport<E> {
    pub run_id: Uuid,
    pub outcome: RunOutcome<E>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Events routed by the dispatcher, the terminal event included.
    pub events_dispatched: u64,
}

impl<E> RunReport<E> {
    pub fn status(&self) -> RunStatus {
        self.outcome.status()
    }
}

/// Shared accounting for one run, created fresh per `run` call.
struct RunState<E: RunEvent> {
    run_id: Uuid,
    context: Arc<RunContext>,
    joins: Arc<JoinLedger<E>>,
    in_flight: Arc<AtomicUsize>,
    dispatched: Arc<AtomicU64>,
    cancel: CancellationToken,
}

impl<E: RunEvent> Workflow<E> {
    /// Execute one run, seeded with `start`, until a terminal event, a
    /// failure, a stall, or the timeout.
    ///
    /// This never returns an error itself; every failure mode is captured
    /// in the report's outcome so callers see exactly one terminal state.
    pub async fn run(&self, start: E, timeout: Duration) -> RunReport<E> {
        let run_id = Uuid::now_v7();
        let started_at = Utc::now();
        let started = Instant::now();
        let state = RunState {
            run_id,
            context: Arc::new(RunContext::new(run_id)),
            joins: Arc::new(JoinLedger::new()),
            in_flight: Arc::new(AtomicUsize::new(0)),
            dispatched: Arc::new(AtomicU64::new(0)),
            cancel: CancellationToken::new(),
        };

        tracing::info!(
            run_id = %run_id,
            start_kind = start.kind(),
            timeout_secs = timeout.as_secs(),
            "run started"
        );
        self.progress.publish(ProgressEvent::RunStarted { run_id });

        let outcome = match tokio::time::timeout(timeout, self.dispatch(&state, start)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                // Dropping the dispatch future dropped its join set, which
                // aborted every invocation still running.
                state.cancel.cancel();
                tracing::warn!(
                    run_id = %run_id,
                    abandoned = state.in_flight.load(Ordering::SeqCst),
                    "run timed out"
                );
                RunOutcome::TimedOut
            }
        };

        let elapsed = started.elapsed();
        let duration_ms = elapsed.as_millis() as u64;
        match &outcome {
            RunOutcome::Completed(_) => {
                tracing::info!(run_id = %run_id, duration_ms, "run completed");
                self.progress
                    .publish(ProgressEvent::RunCompleted { run_id, duration_ms });
            }
            RunOutcome::Failed(err) => {
                tracing::error!(run_id = %run_id, error = %err, "run failed");
                self.progress.publish(ProgressEvent::RunFailed {
                    run_id,
                    error: err.to_string(),
                });
            }
            RunOutcome::TimedOut => {
                self.progress.publish(ProgressEvent::RunTimedOut { run_id });
            }
        }

        RunReport {
            run_id,
            outcome,
            started_at,
            finished_at: Utc::now(),
            elapsed,
            events_dispatched: state.dispatched.load(Ordering::Relaxed),
        }
    }

    /// The dispatcher: route queued events to steps until a terminal state.
    ///
    /// Quiescence is tracked with a counter of in-flight events. `emit`
    /// increments it before queueing and each invocation decrements it only
    /// after its outputs are queued, so the counter can reach zero only
    /// when there is truly nothing left to do.
    async fn dispatch(&self, state: &RunState<E>, start: E) -> RunOutcome<E> {
        let run_id = state.run_id;
        let (queue_tx, mut queue_rx) = mpsc::unbounded_channel::<E>();
        let mut tasks: JoinSet<Result<(), EngineError>> = JoinSet::new();

        // The seed is emitted like any other event so accounting starts
        // at one.
        state.in_flight.fetch_add(1, Ordering::SeqCst);
        if queue_tx.send(start).is_err() {
            return RunOutcome::Failed(EngineError::Config(
                "event queue closed before dispatch began".to_string(),
            ));
        }

        loop {
            tokio::select! {
                Some(event) = queue_rx.recv() => {
                    state.dispatched.fetch_add(1, Ordering::Relaxed);

                    if event.is_stop() {
                        state.in_flight.fetch_sub(1, Ordering::SeqCst);
                        tracing::info!(
                            run_id = %run_id,
                            abandoned_tasks = tasks.len(),
                            "terminal event routed"
                        );
                        state.cancel.cancel();
                        tasks.abort_all();
                        break RunOutcome::Completed(event);
                    }

                    let Some(&step_index) = self.route.get(event.kind()) else {
                        state.cancel.cancel();
                        tasks.abort_all();
                        break RunOutcome::Failed(EngineError::UnroutedEvent {
                            kind: event.kind(),
                        });
                    };

                    let step = Arc::clone(&self.steps[step_index]);
                    let ctx = StepContext::new(
                        run_id,
                        step.name(),
                        Arc::clone(&state.context),
                        Arc::clone(&state.joins),
                        queue_tx.clone(),
                        Arc::clone(&state.in_flight),
                        self.progress.clone(),
                    );
                    let progress = self.progress.clone();
                    let cancel = state.cancel.clone();

                    tasks.spawn(async move {
                        // FIFO permits: queued invocations of a step start
                        // in the order their events were dispatched.
                        let permit = match Arc::clone(&step.semaphore).acquire_owned().await {
                            Ok(permit) => permit,
                            Err(_) => {
                                ctx.settle();
                                return Err(EngineError::Config(format!(
                                    "worker pool for step '{}' is closed",
                                    step.name()
                                )));
                            }
                        };
                        let _permit = permit;

                        if cancel.is_cancelled() {
                            ctx.settle();
                            return Ok(());
                        }

                        let kind = event.kind();
                        progress.publish(ProgressEvent::StepStarted {
                            run_id,
                            step: step.name().to_string(),
                        });
                        tracing::debug!(
                            run_id = %run_id,
                            step = step.name(),
                            kind,
                            "step invocation started"
                        );

                        let invoked = Instant::now();
                        match step.step.handle(event, ctx.clone()).await {
                            Ok(outputs) => {
                                // Outputs are queued before this event is
                                // settled, so the run cannot look quiescent
                                // in between.
                                for output in outputs {
                                    ctx.emit(output);
                                }
                                ctx.settle();
                                let duration_ms = invoked.elapsed().as_millis() as u64;
                                progress.publish(ProgressEvent::StepCompleted {
                                    run_id,
                                    step: step.name().to_string(),
                                    duration_ms,
                                });
                                tracing::debug!(
                                    run_id = %run_id,
                                    step = step.name(),
                                    duration_ms,
                                    "step invocation completed"
                                );
                                Ok(())
                            }
                            Err(err) => {
                                ctx.settle();
                                progress.publish(ProgressEvent::StepFailed {
                                    run_id,
                                    step: step.name().to_string(),
                                    error: err.to_string(),
                                });
                                tracing::warn!(
                                    run_id = %run_id,
                                    step = step.name(),
                                    error = %err,
                                    "step invocation failed"
                                );
                                Err(err)
                            }
                        }
                    });
                }

                Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                    match result {
                        Ok(Ok(())) => {
                            if tasks.is_empty()
                                && state.in_flight.load(Ordering::SeqCst) == 0
                            {
                                state.cancel.cancel();
                                break RunOutcome::Failed(EngineError::Stalled);
                            }
                        }
                        Ok(Err(err)) => {
                            state.cancel.cancel();
                            tasks.abort_all();
                            break RunOutcome::Failed(err);
                        }
                        Err(join_err) => {
                            state.cancel.cancel();
                            tasks.abort_all();
                            break RunOutcome::Failed(EngineError::StepPanicked(
                                join_err.to_string(),
                            ));
                        }
                    }
                }
            }
        }
    }
}
