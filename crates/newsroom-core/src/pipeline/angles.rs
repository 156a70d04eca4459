//! Angle research: the parallel fan-out leg of the pipeline.

use std::sync::Arc;

use newsroom_types::content::AngleFindings;
use newsroom_types::event::{PipelineEvent, kind};

use crate::collab::SearchProvider;
use crate::engine::{EngineError, Step, StepContext};

/// Searches one assigned angle and reports its findings.
///
/// Runs with a configurable worker count so the three angles of a typical
/// run are searched concurrently.
pub struct AngleResearchStep<S> {
    search: Arc<S>,
    workers: usize,
}

impl<S> AngleResearchStep<S> {
    pub fn new(search: Arc<S>, workers: usize) -> Self {
        Self { search, workers }
    }
}

impl<S> Step<PipelineEvent> for AngleResearchStep<S>
where
    S: SearchProvider + 'static,
{
    fn name(&self) -> &'static str {
        "angle-research"
    }

    fn accepts(&self) -> &'static [&'static str] {
        &[kind::ANGLE_ASSIGNED]
    }

    fn emits(&self) -> &'static [&'static str] {
        &[kind::ANGLE_RESEARCHED]
    }

    fn workers(&self) -> usize {
        self.workers
    }

    async fn handle(
        &self,
        event: PipelineEvent,
        ctx: StepContext<PipelineEvent>,
    ) -> Result<Vec<PipelineEvent>, EngineError> {
        let PipelineEvent::AngleAssigned { angle } = event else {
            return Ok(vec![]);
        };

        ctx.update(format!("digging into: {angle}"));
        let excerpts = self.search.search(&angle).await?;
        tracing::debug!(
            run_id = %ctx.run_id(),
            angle,
            excerpts = excerpts.len(),
            "angle researched"
        );

        Ok(vec![PipelineEvent::AngleResearched {
            findings: AngleFindings { angle, excerpts },
        }])
    }
}
