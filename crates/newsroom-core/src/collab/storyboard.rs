//! Storyboard structuring: turning an article into presentation sections.

use std::future::Future;
use std::sync::Arc;

use newsroom_types::content::Storyboard;
use newsroom_types::error::CollaboratorError;

use super::text::TextProvider;

/// Structures a finished article into a section-by-section storyboard.
pub trait StoryboardProvider: Send + Sync {
    fn structure(
        &self,
        article: &str,
    ) -> impl Future<Output = Result<Storyboard, CollaboratorError>> + Send;
}

/// Slide titles and narration are read aloud by the renderer's narration
/// track, which chokes on ampersands; the model is told to avoid them and
/// any that slip through are stripped afterwards.
const SECTIONING_SYSTEM_PROMPT: &str = r#"Your task is to analyze the article and structure it into logical sections. For each section:
1. Create an appropriate title that reflects the section's content
2. Provide a concise version of the content suitable for presentation slides
3. Include the full original content as narration

Organize the sections in a way that best presents the article's flow and main arguments.
The number of sections should be determined by the natural structure of the content.
The title should be no longer than 3 words.
There should be no more than 6 sections.

Return ONLY a JSON object with this structure:
{
    "sections": [
        {"title": "Section Title", "text": "Concise slide content", "narration": "Full section content"}
    ]
}
DO NOT INCLUDE THE CHARACTER & IN THE NARRATION."#;

/// Storyboard provider backed by a structured text completion.
///
/// Asks the text model for a JSON storyboard, validates the section and
/// title limits, and sanitizes the narration before handing it on.
pub struct PromptStoryboarder<T: TextProvider> {
    text: Arc<T>,
}

impl<T: TextProvider> PromptStoryboarder<T> {
    pub fn new(text: Arc<T>) -> Self {
        Self { text }
    }
}

impl<T: TextProvider> StoryboardProvider for PromptStoryboarder<T> {
    async fn structure(&self, article: &str) -> Result<Storyboard, CollaboratorError> {
        let prompt = format!("Structure this article into sections:\n\n{article}");
        let value = self
            .text
            .complete_structured(Some(SECTIONING_SYSTEM_PROMPT), &prompt)
            .await?;

        let mut storyboard: Storyboard = serde_json::from_value(value)
            .map_err(|err| CollaboratorError::UnexpectedShape(format!("storyboard: {err}")))?;
        storyboard
            .validate()
            .map_err(|err| CollaboratorError::UnexpectedShape(err.to_string()))?;
        storyboard.sanitize_narration();
        Ok(storyboard)
    }
}
