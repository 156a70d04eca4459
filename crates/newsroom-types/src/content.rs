//! Research and publication content types.
//!
//! These are the payloads the pipeline events carry: search excerpts,
//! per-angle findings, the compiled dossier, the story itself, and the
//! storyboard the video renderer consumes.

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of sections a storyboard may contain.
pub const MAX_STORYBOARD_SECTIONS: usize = 6;

/// Maximum number of words in a section title.
pub const MAX_SECTION_TITLE_WORDS: usize = 3;

// ---------------------------------------------------------------------------
// Research content
// ---------------------------------------------------------------------------

/// One search result: a content excerpt and the URL it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceExcerpt {
    pub content: String,
    pub url: String,
}

/// Everything gathered for a single research angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleFindings {
    /// The angle that was researched.
    pub angle: String,
    /// Excerpts in the order the search returned them.
    pub excerpts: Vec<SourceExcerpt>,
}

impl AngleFindings {
    /// All excerpt bodies joined into one block of source material.
    pub fn material(&self) -> String {
        self.excerpts
            .iter()
            .map(|e| e.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Source URLs in excerpt order.
    pub fn urls(&self) -> Vec<String> {
        self.excerpts.iter().map(|e| e.url.clone()).collect()
    }
}

/// The merged research across the initial desk pass and every angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dossier {
    /// Combined source material, one angle after another.
    pub material: String,
    /// Every reference URL: desk research first, then angles in the order
    /// their findings arrived.
    pub references: Vec<String>,
}

// ---------------------------------------------------------------------------
// Story
// ---------------------------------------------------------------------------

/// A written story together with its references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// The article body.
    pub body: String,
    /// Ordered reference URLs.
    pub references: Vec<String>,
}

impl Story {
    /// Render the story as markdown: the body followed by a numbered
    /// `## References` list.
    pub fn to_markdown(&self) -> String {
        let mut markdown = format!("{}\n\n## References\n", self.body);
        for (i, url) in self.references.iter().enumerate() {
            markdown.push_str(&format!("{}. {}\n", i + 1, url));
        }
        markdown
    }
}

// ---------------------------------------------------------------------------
// Storyboard
// ---------------------------------------------------------------------------

/// One slide of the presentation: a short title, the on-screen text, and the
/// spoken narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub text: String,
    pub narration: String,
}

/// The structured form of an essay, ready for video rendering.
///
/// Limits match what the renderer can lay out: at most
/// [`MAX_STORYBOARD_SECTIONS`] sections, titles of at most
/// [`MAX_SECTION_TITLE_WORDS`] words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storyboard {
    pub sections: Vec<Section>,
}

impl Storyboard {
    /// Check the section-count and title-length limits.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.sections.is_empty() {
            return Err(ContentError::Empty);
        }
        if self.sections.len() > MAX_STORYBOARD_SECTIONS {
            return Err(ContentError::TooManySections {
                count: self.sections.len(),
                limit: MAX_STORYBOARD_SECTIONS,
            });
        }
        for section in &self.sections {
            let words = section.title.split_whitespace().count();
            if words > MAX_SECTION_TITLE_WORDS {
                return Err(ContentError::TitleTooLong {
                    title: section.title.clone(),
                    limit: MAX_SECTION_TITLE_WORDS,
                });
            }
        }
        Ok(())
    }

    /// Replace `&` with `and` in every narration. The speech synthesizer
    /// mangles ampersands.
    pub fn sanitize_narration(&mut self) {
        for section in &mut self.sections {
            if section.narration.contains('&') {
                section.narration = section.narration.replace('&', "and");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn section(title: &str) -> Section {
        Section {
            title: title.to_string(),
            text: "slide text".to_string(),
            narration: "narration".to_string(),
        }
    }

    #[test]
    fn test_story_to_markdown_numbers_references() {
        let story = Story {
            body: "The article body.".to_string(),
            references: vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ],
        };

        let markdown = story.to_markdown();
        assert_eq!(
            markdown,
            "The article body.\n\n## References\n1. https://example.com/a\n2. https://example.com/b\n"
        );
    }

    #[test]
    fn test_story_to_markdown_empty_references() {
        let story = Story {
            body: "Body only.".to_string(),
            references: vec![],
        };
        assert_eq!(story.to_markdown(), "Body only.\n\n## References\n");
    }

    #[test]
    fn test_angle_findings_material_and_urls() {
        let findings = AngleFindings {
            angle: "quantum error correction".to_string(),
            excerpts: vec![
                SourceExcerpt {
                    content: "first excerpt".to_string(),
                    url: "https://a.example".to_string(),
                },
                SourceExcerpt {
                    content: "second excerpt".to_string(),
                    url: "https://b.example".to_string(),
                },
            ],
        };

        assert_eq!(findings.material(), "first excerpt\nsecond excerpt");
        assert_eq!(findings.urls(), vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_storyboard_validate_accepts_limits() {
        let storyboard = Storyboard {
            sections: (0..MAX_STORYBOARD_SECTIONS)
                .map(|_| section("Three Word Title"))
                .collect(),
        };
        assert!(storyboard.validate().is_ok());
    }

    #[test]
    fn test_storyboard_validate_rejects_too_many_sections() {
        let storyboard = Storyboard {
            sections: (0..=MAX_STORYBOARD_SECTIONS).map(|_| section("Intro")).collect(),
        };
        let err = storyboard.validate().unwrap_err();
        assert!(matches!(err, ContentError::TooManySections { count: 7, .. }));
    }

    #[test]
    fn test_storyboard_validate_rejects_long_title() {
        let storyboard = Storyboard {
            sections: vec![section("A Title With Too Many Words")],
        };
        let err = storyboard.validate().unwrap_err();
        assert!(matches!(err, ContentError::TitleTooLong { .. }));
    }

    #[test]
    fn test_storyboard_validate_rejects_empty() {
        let storyboard = Storyboard { sections: vec![] };
        assert!(matches!(storyboard.validate(), Err(ContentError::Empty)));
    }

    #[test]
    fn test_sanitize_narration_replaces_ampersands() {
        let mut storyboard = Storyboard {
            sections: vec![Section {
                title: "Intro".to_string(),
                text: "AI & robotics".to_string(),
                narration: "AI & robotics & more".to_string(),
            }],
        };
        storyboard.sanitize_narration();
        assert_eq!(storyboard.sections[0].narration, "AI and robotics and more");
        // Only the narration is touched, the slide text keeps its ampersand.
        assert_eq!(storyboard.sections[0].text, "AI & robotics");
    }

    #[test]
    fn test_storyboard_serde_roundtrip() {
        let storyboard = Storyboard {
            sections: vec![section("Overview")],
        };
        let json = serde_json::to_string(&storyboard).unwrap();
        assert!(json.contains("\"sections\""));
        let parsed: Storyboard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, storyboard);
    }
}
