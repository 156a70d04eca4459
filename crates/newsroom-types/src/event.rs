//! Pipeline events.
//!
//! `PipelineEvent` is the message type the newsroom workflow routes between
//! its steps. Each variant is immutable once constructed; steps communicate
//! only by emitting new events. `Commission` seeds a run and
//! `StoryPublished` terminates it.

use serde::{Deserialize, Serialize};

use crate::content::{AngleFindings, Dossier, Story};

/// Routing discriminants for [`PipelineEvent`].
pub mod kind {
    pub const COMMISSION: &str = "commission";
    pub const ANGLE_ASSIGNED: &str = "angle-assigned";
    pub const ANGLE_RESEARCHED: &str = "angle-researched";
    pub const RESEARCH_COMPILED: &str = "research-compiled";
    pub const DRAFT_FILED: &str = "draft-filed";
    pub const EDITOR_NOTES_FILED: &str = "editor-notes-filed";
    pub const STORY_PUBLISHED: &str = "story-published";
}

/// One message in the newsroom workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A story has been commissioned on `topic`. Seeds the run.
    Commission { topic: String },

    /// One research angle to pursue; the fan-out unit.
    AngleAssigned { angle: String },

    /// Search findings for one angle.
    AngleResearched { findings: AngleFindings },

    /// Every angle's findings merged with the desk research.
    ResearchCompiled { dossier: Dossier },

    /// The writer filed a draft.
    DraftFiled { draft: Story },

    /// The editor filed improvement notes on the current draft.
    EditorNotesFiled { notes: String },

    /// The final story. Terminates the run; the payload is the run result.
    StoryPublished { story: Story },
}

impl PipelineEvent {
    /// The routing discriminant for this event.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineEvent::Commission { .. } => kind::COMMISSION,
            PipelineEvent::AngleAssigned { .. } => kind::ANGLE_ASSIGNED,
            PipelineEvent::AngleResearched { .. } => kind::ANGLE_RESEARCHED,
            PipelineEvent::ResearchCompiled { .. } => kind::RESEARCH_COMPILED,
            PipelineEvent::DraftFiled { .. } => kind::DRAFT_FILED,
            PipelineEvent::EditorNotesFiled { .. } => kind::EDITOR_NOTES_FILED,
            PipelineEvent::StoryPublished { .. } => kind::STORY_PUBLISHED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let event = PipelineEvent::Commission {
            topic: "fusion power".to_string(),
        };
        assert_eq!(event.kind(), kind::COMMISSION);

        let event = PipelineEvent::AngleAssigned {
            angle: "recent milestones".to_string(),
        };
        assert_eq!(event.kind(), kind::ANGLE_ASSIGNED);
    }

    #[test]
    fn test_event_serde_roundtrip() {
        let event = PipelineEvent::StoryPublished {
            story: Story {
                body: "done".to_string(),
                references: vec!["https://example.com".to_string()],
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"story_published\""));
        let parsed: PipelineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_kinds_are_distinct() {
        let kinds = [
            kind::COMMISSION,
            kind::ANGLE_ASSIGNED,
            kind::ANGLE_RESEARCHED,
            kind::RESEARCH_COMPILED,
            kind::DRAFT_FILED,
            kind::EDITOR_NOTES_FILED,
            kind::STORY_PUBLISHED,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in kinds.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
