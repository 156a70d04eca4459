//! Artifact naming for one published topic.

use std::path::{Path, PathBuf};

/// Derive the filename slug for a topic: lowercased, spaces to underscores.
pub fn slugify(topic: &str) -> String {
    topic.to_lowercase().replace(' ', "_")
}

/// The artifact paths for one topic inside an output directory.
///
/// Every artifact shares the topic slug as a prefix, so repeated runs on
/// the same topic overwrite their previous output instead of piling up.
#[derive(Debug, Clone)]
pub struct Publication {
    slug: String,
    dir: PathBuf,
}

impl Publication {
    pub fn new(output_dir: &Path, topic: &str) -> Self {
        Self {
            slug: slugify(topic),
            dir: output_dir.to_path_buf(),
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{slug}_essay.md`
    pub fn essay_path(&self) -> PathBuf {
        self.dir.join(format!("{}_essay.md", self.slug))
    }

    /// `{slug}_illustration.jpg`
    pub fn illustration_path(&self) -> PathBuf {
        self.dir.join(format!("{}_illustration.jpg", self.slug))
    }

    /// `{slug}_structured_content.json`
    pub fn storyboard_path(&self) -> PathBuf {
        self.dir.join(format!("{}_structured_content.json", self.slug))
    }

    /// `{slug}_video.mp4`
    pub fn video_path(&self) -> PathBuf {
        self.dir.join(format!("{}_video.mp4", self.slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_lowercases_and_underscores() {
        assert_eq!(slugify("Quantum Computing"), "quantum_computing");
        assert_eq!(slugify("AI"), "ai");
        assert_eq!(slugify("three word topic"), "three_word_topic");
    }

    #[test]
    fn test_artifact_paths_share_the_slug() {
        let publication = Publication::new(Path::new("/tmp/publication"), "Fusion Power Now");

        assert_eq!(publication.slug(), "fusion_power_now");
        assert_eq!(
            publication.essay_path(),
            PathBuf::from("/tmp/publication/fusion_power_now_essay.md")
        );
        assert_eq!(
            publication.illustration_path(),
            PathBuf::from("/tmp/publication/fusion_power_now_illustration.jpg")
        );
        assert_eq!(
            publication.storyboard_path(),
            PathBuf::from("/tmp/publication/fusion_power_now_structured_content.json")
        );
        assert_eq!(
            publication.video_path(),
            PathBuf::from("/tmp/publication/fusion_power_now_video.mp4")
        );
    }
}
