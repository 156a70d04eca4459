//! The writer: drafts from the dossier, refines from editor notes.

use std::sync::Arc;

use newsroom_types::content::Story;
use newsroom_types::event::{PipelineEvent, kind};

use crate::collab::TextProvider;
use crate::engine::{EngineError, Step, StepContext};

use super::keys;

/// Union-input step: consumes both the compiled dossier and editor notes.
///
/// On a dossier it writes the first draft and stashes the body and the
/// references in the context. On editor notes it rewrites the current
/// draft; once the configured number of feedback rounds has been absorbed
/// the rewrite is published instead of going back to the editor. With the
/// cap at zero the first draft is published directly.
pub struct WriteStoryStep<T> {
    text: Arc<T>,
    max_refine_rounds: u32,
}

impl<T> WriteStoryStep<T> {
    pub fn new(text: Arc<T>, max_refine_rounds: u32) -> Self {
        Self {
            text,
            max_refine_rounds,
        }
    }
}

impl<T> WriteStoryStep<T>
where
    T: TextProvider + 'static,
{
    async fn draft(
        &self,
        ctx: &StepContext<PipelineEvent>,
        material: String,
        references: Vec<String>,
    ) -> Result<Vec<PipelineEvent>, EngineError> {
        let topic: String = ctx.get_required(keys::TOPIC)?;
        ctx.update("writing the first draft");

        let prompt = format!(
            "You are a world famous journalist. You are tasked with writing a \
             very detailed long form article about {topic}.\n\
             These are some source materials for you to choose from and use to \
             write the article:\n{material}"
        );
        let body = self.text.complete(&prompt).await?;

        ctx.set(keys::DRAFT_BODY, &body)?;
        ctx.set(keys::REFERENCES, &references)?;

        let story = Story { body, references };
        if self.max_refine_rounds == 0 {
            ctx.update("publishing the first draft, no feedback rounds configured");
            return Ok(vec![PipelineEvent::StoryPublished { story }]);
        }
        Ok(vec![PipelineEvent::DraftFiled { draft: story }])
    }

    async fn refine(
        &self,
        ctx: &StepContext<PipelineEvent>,
        notes: String,
    ) -> Result<Vec<PipelineEvent>, EngineError> {
        let topic: String = ctx.get_required(keys::TOPIC)?;
        let draft: String = ctx.get_required(keys::DRAFT_BODY)?;
        let references: Vec<String> = ctx.get_required(keys::REFERENCES)?;

        let rounds: u32 = ctx.get(keys::REFINE_ROUNDS)?.unwrap_or(0) + 1;
        ctx.set(keys::REFINE_ROUNDS, &rounds)?;
        ctx.update(format!("refining the draft, round {rounds}"));

        let prompt = format!(
            "You are a world famous journalist. You are tasked with writing a \
             very detailed long form article about {topic}.\n\n\
             Here is a draft of the article you wrote:\n{draft}\n\
             Here is the commentary from the editor:\n{notes}\n\
             Refine it to make it more engaging and interesting. Respond with \
             only the name and content of the article, NO other commentary or \
             metadata:"
        );
        let body = self.text.complete(&prompt).await?;

        if rounds >= self.max_refine_rounds {
            return Ok(vec![PipelineEvent::StoryPublished {
                story: Story { body, references },
            }]);
        }

        ctx.set(keys::DRAFT_BODY, &body)?;
        Ok(vec![PipelineEvent::DraftFiled {
            draft: Story { body, references },
        }])
    }
}

impl<T> Step<PipelineEvent> for WriteStoryStep<T>
where
    T: TextProvider + 'static,
{
    fn name(&self) -> &'static str {
        "write-story"
    }

    fn accepts(&self) -> &'static [&'static str] {
        &[kind::RESEARCH_COMPILED, kind::EDITOR_NOTES_FILED]
    }

    fn emits(&self) -> &'static [&'static str] {
        &[kind::DRAFT_FILED, kind::STORY_PUBLISHED]
    }

    async fn handle(
        &self,
        event: PipelineEvent,
        ctx: StepContext<PipelineEvent>,
    ) -> Result<Vec<PipelineEvent>, EngineError> {
        match event {
            PipelineEvent::ResearchCompiled { dossier } => {
                self.draft(&ctx, dossier.material, dossier.references).await
            }
            PipelineEvent::EditorNotesFiled { notes } => self.refine(&ctx, notes).await,
            _ => Ok(vec![]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{ScriptedWriter, step_ctx};
    use newsroom_types::content::Dossier;

    fn compiled() -> PipelineEvent {
        PipelineEvent::ResearchCompiled {
            dossier: Dossier {
                material: "source materials body".to_string(),
                references: vec!["https://sources.test/one".to_string()],
            },
        }
    }

    fn notes() -> PipelineEvent {
        PipelineEvent::EditorNotesFiled {
            notes: "tighten the opening paragraph".to_string(),
        }
    }

    #[tokio::test]
    async fn dossier_becomes_a_filed_draft() {
        let step = WriteStoryStep::new(Arc::new(ScriptedWriter::default()), 1);
        let (ctx, _rx) = step_ctx("write-story");
        ctx.set(keys::TOPIC, &"tidal power".to_string()).unwrap();

        let out = step.handle(compiled(), ctx.clone()).await.unwrap();

        let [PipelineEvent::DraftFiled { draft }] = out.as_slice() else {
            panic!("expected a filed draft, got {out:?}");
        };
        assert_eq!(draft.body, "draft v1");
        let stored: String = ctx.get_required(keys::DRAFT_BODY).unwrap();
        assert_eq!(stored, "draft v1");
        let references: Vec<String> = ctx.get_required(keys::REFERENCES).unwrap();
        assert_eq!(references, vec!["https://sources.test/one"]);
    }

    #[tokio::test]
    async fn final_round_publishes() {
        let step = WriteStoryStep::new(Arc::new(ScriptedWriter::default()), 1);
        let (ctx, _rx) = step_ctx("write-story");
        ctx.set(keys::TOPIC, &"tidal power".to_string()).unwrap();

        step.handle(compiled(), ctx.clone()).await.unwrap();
        let out = step.handle(notes(), ctx.clone()).await.unwrap();

        let [PipelineEvent::StoryPublished { story }] = out.as_slice() else {
            panic!("expected publication, got {out:?}");
        };
        assert_eq!(story.body, "draft v2");
        assert_eq!(story.references, vec!["https://sources.test/one"]);
    }

    #[tokio::test]
    async fn intermediate_round_files_another_draft() {
        let step = WriteStoryStep::new(Arc::new(ScriptedWriter::default()), 2);
        let (ctx, _rx) = step_ctx("write-story");
        ctx.set(keys::TOPIC, &"tidal power".to_string()).unwrap();

        step.handle(compiled(), ctx.clone()).await.unwrap();

        let out = step.handle(notes(), ctx.clone()).await.unwrap();
        let [PipelineEvent::DraftFiled { draft }] = out.as_slice() else {
            panic!("expected another draft, got {out:?}");
        };
        assert_eq!(draft.body, "draft v2");
        // The refined body replaces the stored draft for the next round.
        let stored: String = ctx.get_required(keys::DRAFT_BODY).unwrap();
        assert_eq!(stored, "draft v2");

        let out = step.handle(notes(), ctx.clone()).await.unwrap();
        assert!(matches!(
            out.as_slice(),
            [PipelineEvent::StoryPublished { story }] if story.body == "draft v3"
        ));
    }

    #[tokio::test]
    async fn zero_cap_publishes_without_editing() {
        let step = WriteStoryStep::new(Arc::new(ScriptedWriter::default()), 0);
        let (ctx, _rx) = step_ctx("write-story");
        ctx.set(keys::TOPIC, &"tidal power".to_string()).unwrap();

        let out = step.handle(compiled(), ctx).await.unwrap();
        assert!(matches!(
            out.as_slice(),
            [PipelineEvent::StoryPublished { story }] if story.body == "draft v1"
        ));
    }
}
