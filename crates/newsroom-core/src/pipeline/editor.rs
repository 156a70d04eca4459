//! The editor: reads drafts and files improvement notes.

use std::sync::Arc;

use newsroom_types::event::{PipelineEvent, kind};

use crate::collab::TextProvider;
use crate::engine::{EngineError, Step, StepContext};

use super::keys;

/// Reviews each filed draft and sends commentary back to the writer.
pub struct EditStoryStep<T> {
    text: Arc<T>,
}

impl<T> EditStoryStep<T> {
    pub fn new(text: Arc<T>) -> Self {
        Self { text }
    }
}

impl<T> Step<PipelineEvent> for EditStoryStep<T>
where
    T: TextProvider + 'static,
{
    fn name(&self) -> &'static str {
        "edit-story"
    }

    fn accepts(&self) -> &'static [&'static str] {
        &[kind::DRAFT_FILED]
    }

    fn emits(&self) -> &'static [&'static str] {
        &[kind::EDITOR_NOTES_FILED]
    }

    async fn handle(
        &self,
        event: PipelineEvent,
        ctx: StepContext<PipelineEvent>,
    ) -> Result<Vec<PipelineEvent>, EngineError> {
        let PipelineEvent::DraftFiled { draft } = event else {
            return Ok(vec![]);
        };

        let topic: String = ctx.get_required(keys::TOPIC)?;
        ctx.update("editor reviewing the draft");

        let prompt = format!(
            "You are a veteran newspaper editor. Here is a draft of a long form \
             article about {topic}:\n{body}\n\
             Read it carefully and suggest ideas for improvement.",
            body = draft.body
        );
        let notes = self.text.complete(&prompt).await?;

        Ok(vec![PipelineEvent::EditorNotesFiled { notes }])
    }
}
