//! The editorial pipeline: commission in, published story out.
//!
//! Five steps wired into one workflow:
//!
//! 1. `desk-research` seeds the context with the topic and plans the
//!    research angles, fanning one `angle-assigned` event out per angle.
//! 2. `angle-research` searches each angle, several in parallel.
//! 3. `compile-research` joins the findings into a single dossier.
//! 4. `write-story` drafts from the dossier and later refines the draft
//!    from editor notes, publishing once the refine-round cap is reached.
//! 5. `edit-story` reads each draft and files improvement notes.
//!
//! [`NewsDesk`] owns the collaborators and run configuration and is the
//! front door for callers.

use std::sync::Arc;
use std::time::Duration;

use newsroom_types::config::RunConfig;
use newsroom_types::content::Story;
use newsroom_types::event::{PipelineEvent, kind};
use thiserror::Error;

use crate::collab::{SearchProvider, TextProvider};
use crate::engine::{EngineError, RunEvent, RunOutcome, Workflow};
use crate::progress::ProgressBus;

pub mod angles;
pub mod compile;
pub mod desk;
pub mod editor;
pub mod writer;

pub use angles::AngleResearchStep;
pub use compile::CompileResearchStep;
pub use desk::DeskResearchStep;
pub use editor::EditStoryStep;
pub use writer::WriteStoryStep;

impl RunEvent for PipelineEvent {
    const STOP: &'static str = kind::STORY_PUBLISHED;

    fn kind(&self) -> &'static str {
        PipelineEvent::kind(self)
    }
}

/// Context-store keys shared between pipeline steps.
pub(crate) mod keys {
    pub const TOPIC: &str = "topic";
    pub const DESK_REFERENCES: &str = "desk_references";
    pub const ANGLE_COUNT: &str = "angle_count";
    pub const DRAFT_BODY: &str = "draft_body";
    pub const REFERENCES: &str = "reference_urls";
    pub const REFINE_ROUNDS: &str = "refine_rounds";
}

/// Why a research run did not produce a story.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// The run hit its deadline before a story was published.
    #[error("research run timed out after {secs}s")]
    TimedOut { secs: u64 },

    /// A step failed or the workflow was misconfigured.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The run terminated on something other than a published story.
    #[error("run finished with an unexpected terminal event '{kind}'")]
    UnexpectedTerminal { kind: &'static str },
}

/// The assembled newsroom: collaborators, configuration, and the workflow
/// that connects them.
///
/// `S` searches, `P` plans angles (a colder text model), and `T` writes
/// prose. One desk can research any number of topics; each call to
/// [`NewsDesk::research`] is an isolated run.
pub struct NewsDesk<S, P, T> {
    search: Arc<S>,
    planner: Arc<P>,
    text: Arc<T>,
    config: RunConfig,
    progress: ProgressBus,
}

impl<S, P, T> NewsDesk<S, P, T>
where
    S: SearchProvider + 'static,
    P: TextProvider + 'static,
    T: TextProvider + 'static,
{
    pub fn new(
        search: Arc<S>,
        planner: Arc<P>,
        text: Arc<T>,
        config: RunConfig,
        progress: ProgressBus,
    ) -> Self {
        Self {
            search,
            planner,
            text,
            config,
            progress,
        }
    }

    /// Build the editorial workflow with this desk's collaborators.
    pub fn workflow(&self) -> Result<Workflow<PipelineEvent>, EngineError> {
        Workflow::builder()
            .step(DeskResearchStep::new(
                Arc::clone(&self.search),
                Arc::clone(&self.planner),
            ))
            .step(AngleResearchStep::new(
                Arc::clone(&self.search),
                self.config.angle_workers,
            ))
            .step(CompileResearchStep)
            .step(WriteStoryStep::new(
                Arc::clone(&self.text),
                self.config.max_refine_rounds,
            ))
            .step(EditStoryStep::new(Arc::clone(&self.text)))
            .progress(self.progress.clone())
            .build()
    }

    /// Research `topic` end to end and return the published story.
    pub async fn research(&self, topic: &str) -> Result<Story, ResearchError> {
        let workflow = self.workflow()?;
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let report = workflow
            .run(
                PipelineEvent::Commission {
                    topic: topic.to_string(),
                },
                timeout,
            )
            .await;

        match report.outcome {
            RunOutcome::Completed(PipelineEvent::StoryPublished { story }) => Ok(story),
            RunOutcome::Completed(other) => Err(ResearchError::UnexpectedTerminal {
                kind: other.kind(),
            }),
            RunOutcome::Failed(err) => Err(ResearchError::Engine(err)),
            RunOutcome::TimedOut => Err(ResearchError::TimedOut {
                secs: self.config.timeout_secs,
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{CannedSearch, ScriptedWriter};
    use super::*;

    fn desk(config: RunConfig) -> NewsDesk<CannedSearch, ScriptedWriter, ScriptedWriter> {
        NewsDesk::new(
            Arc::new(CannedSearch),
            Arc::new(ScriptedWriter::default()),
            Arc::new(ScriptedWriter::default()),
            config,
            ProgressBus::default(),
        )
    }

    #[tokio::test]
    async fn commission_to_publication_end_to_end() {
        let story = desk(RunConfig::default()).research("tidal power").await.unwrap();

        // Default config runs one feedback round: draft v1, then the
        // refined v2 is published.
        assert_eq!(story.body, "draft v2");
        // Desk reference first, then one per angle.
        assert_eq!(story.references.len(), 4);
        assert_eq!(story.references[0], "https://sources.test/tidal-power");
        assert!(
            story
                .references
                .iter()
                .any(|url| url == "https://sources.test/alpha-angle")
        );
    }

    #[tokio::test]
    async fn extra_refine_rounds_produce_later_drafts() {
        let config = RunConfig {
            max_refine_rounds: 2,
            ..RunConfig::default()
        };

        let story = desk(config).research("tidal power").await.unwrap();
        assert_eq!(story.body, "draft v3");
    }

    #[tokio::test]
    async fn zero_refine_rounds_publishes_the_first_draft() {
        let config = RunConfig {
            max_refine_rounds: 0,
            ..RunConfig::default()
        };

        let story = desk(config).research("tidal power").await.unwrap();
        assert_eq!(story.body, "draft v1");
    }

    #[tokio::test]
    async fn workflow_wiring_is_valid() {
        let workflow = desk(RunConfig::default()).workflow().unwrap();
        assert_eq!(
            workflow.step_names(),
            vec![
                "desk-research",
                "angle-research",
                "compile-research",
                "write-story",
                "edit-story",
            ]
        );
    }
}
