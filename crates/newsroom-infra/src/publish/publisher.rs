//! Publisher -- drives the post-run stages that turn a story into
//! publication artifacts.
//!
//! Stage order and failure policy:
//!
//! 1. essay markdown -- failure is fatal;
//! 2. illustration -- ask the text collaborator for an image concept,
//!    generate, download; any failure downgrades to a warning and the
//!    publication continues without one;
//! 3. storyboard JSON -- failure is fatal;
//! 4. video render -- skipped with a warning when there is no illustration
//!    to put on the title slide; a renderer failure or a missing output
//!    file is fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use newsroom_core::collab::{ImageProvider, StoryboardProvider, TextProvider, VideoRenderer};
use newsroom_core::progress::ProgressBus;
use newsroom_types::content::Story;
use newsroom_types::error::PublishError;
use newsroom_types::progress::ProgressEvent;

use super::publication::Publication;

/// What one publication produced.
#[derive(Debug, Clone, Serialize)]
pub struct PublicationReport {
    pub slug: String,
    pub essay: PathBuf,
    pub storyboard: PathBuf,
    pub illustration: Option<PathBuf>,
    pub video: Option<PathBuf>,
    /// Notes for stages that were downgraded or skipped.
    pub warnings: Vec<String>,
}

/// Publishes completed stories into an output directory.
pub struct Publisher<T, I, B, V> {
    output_dir: PathBuf,
    http: reqwest::Client,
    progress: ProgressBus,
    text: Arc<T>,
    images: Arc<I>,
    boards: Arc<B>,
    renderer: Arc<V>,
}

impl<T, I, B, V> Publisher<T, I, B, V>
where
    T: TextProvider,
    I: ImageProvider,
    B: StoryboardProvider,
    V: VideoRenderer,
{
    pub fn new(
        output_dir: PathBuf,
        progress: ProgressBus,
        text: Arc<T>,
        images: Arc<I>,
        boards: Arc<B>,
        renderer: Arc<V>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");

        Self {
            output_dir,
            http,
            progress,
            text,
            images,
            boards,
            renderer,
        }
    }

    /// Run every publication stage for `story` and report what was written.
    pub async fn publish(
        &self,
        run_id: Uuid,
        topic: &str,
        story: &Story,
    ) -> Result<PublicationReport, PublishError> {
        let publication = Publication::new(&self.output_dir, topic);
        let markdown = story.to_markdown();
        let mut warnings = Vec::new();

        self.update(run_id, "filing the essay");
        let essay = file_essay(&self.output_dir, topic, story).await?;
        tracing::info!(run_id = %run_id, path = %essay.display(), "essay filed");

        self.update(run_id, "creating the illustration");
        let illustration = match self
            .stage_illustration(&markdown, &publication.illustration_path())
            .await
        {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!(
                    run_id = %run_id,
                    error = %err,
                    "illustration failed, continuing without one"
                );
                let note = "using default illustration";
                self.update(run_id, note);
                warnings.push(note.to_string());
                None
            }
        };

        self.update(run_id, "structuring the essay into sections");
        let storyboard = self
            .stage_storyboard(&markdown, &publication.storyboard_path())
            .await?;

        let video = match &illustration {
            Some(illustration) => {
                self.update(run_id, "rendering the video presentation");
                Some(
                    self.stage_video(&storyboard, illustration, &publication.video_path())
                        .await?,
                )
            }
            None => {
                let note = "skipped the video: no illustration to render";
                self.update(run_id, note);
                warnings.push(note.to_string());
                None
            }
        };

        self.update(run_id, "publication complete");

        Ok(PublicationReport {
            slug: publication.slug().to_string(),
            essay,
            storyboard,
            illustration,
            video,
            warnings,
        })
    }

    async fn stage_illustration(
        &self,
        article: &str,
        dest: &Path,
    ) -> Result<PathBuf, PublishError> {
        let stage = |source| PublishError::Stage {
            stage: "illustration".to_string(),
            source,
        };

        let prompt = self
            .text
            .complete(&illustration_prompt(article))
            .await
            .map_err(stage)?;
        tracing::debug!(prompt = %prompt, "illustration concept ready");

        let url = self.images.generate(&prompt).await.map_err(stage)?;
        self.download(&url, dest).await?;
        Ok(dest.to_path_buf())
    }

    async fn stage_storyboard(&self, article: &str, dest: &Path) -> Result<PathBuf, PublishError> {
        let storyboard = self
            .boards
            .structure(article)
            .await
            .map_err(|source| PublishError::Stage {
                stage: "storyboard".to_string(),
                source,
            })?;

        let json = serde_json::to_string_pretty(&storyboard)?;
        write_file(dest, json.as_bytes()).await?;
        Ok(dest.to_path_buf())
    }

    async fn stage_video(
        &self,
        storyboard: &Path,
        illustration: &Path,
        dest: &Path,
    ) -> Result<PathBuf, PublishError> {
        self.renderer
            .render(storyboard, illustration, dest)
            .await
            .map_err(|source| PublishError::Stage {
                stage: "video".to_string(),
                source,
            })?;

        // A renderer that exits cleanly without producing the file is as
        // fatal as one that errors.
        if !tokio::fs::try_exists(dest).await.unwrap_or(false) {
            return Err(PublishError::ArtifactMissing(dest.display().to_string()));
        }
        Ok(dest.to_path_buf())
    }

    /// Fetch a hosted image to `dest`.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), PublishError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PublishError::Download(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Download(format!("GET {url} returned {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PublishError::Download(format!("reading {url} failed: {e}")))?;

        write_file(dest, &bytes).await
    }

    fn update(&self, run_id: Uuid, message: impl Into<String>) {
        self.progress.publish(ProgressEvent::StageUpdate {
            run_id,
            message: message.into(),
        });
    }
}

/// Write the story's markdown to `{output_dir}/{slug}_essay.md`, creating
/// the directory if needed. Used by the full publication flow and by the
/// essay-only paths.
pub async fn file_essay(
    output_dir: &Path,
    topic: &str,
    story: &Story,
) -> Result<PathBuf, PublishError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| PublishError::Io {
            path: output_dir.display().to_string(),
            source,
        })?;

    let path = Publication::new(output_dir, topic).essay_path();
    write_file(&path, story.to_markdown().as_bytes()).await?;
    Ok(path)
}

fn illustration_prompt(article: &str) -> String {
    format!(
        "You are a veteran illustration artist for long form articles. \
         Here is an article: {article}. Think of a concept for an anime style \
         illustration for this article and write a prompt for the image model \
         to draw it. Your prompt:"
    )
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PublishError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| PublishError::Io {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsroom_types::content::{Section, Storyboard};
    use newsroom_types::error::CollaboratorError;
    use serde_json::Value;
    use tempfile::TempDir;

    struct CannedText;

    impl TextProvider for CannedText {
        async fn complete(&self, _prompt: &str) -> Result<String, CollaboratorError> {
            Ok("a neon newsroom at dusk, anime style".to_string())
        }

        async fn complete_structured(
            &self,
            _system: Option<&str>,
            _prompt: &str,
        ) -> Result<Value, CollaboratorError> {
            Ok(serde_json::json!({}))
        }
    }

    struct BrokenImages;

    impl ImageProvider for BrokenImages {
        async fn generate(&self, _prompt: &str) -> Result<String, CollaboratorError> {
            Err(CollaboratorError::RateLimited)
        }
    }

    struct UnreachableImages;

    impl ImageProvider for UnreachableImages {
        async fn generate(&self, _prompt: &str) -> Result<String, CollaboratorError> {
            // Nothing listens on the discard port, so the download fails.
            Ok("http://127.0.0.1:9/illustration.png".to_string())
        }
    }

    struct CannedBoards;

    impl StoryboardProvider for CannedBoards {
        async fn structure(&self, _article: &str) -> Result<Storyboard, CollaboratorError> {
            Ok(Storyboard {
                sections: vec![Section {
                    title: "Intro".to_string(),
                    text: "slide text".to_string(),
                    narration: "narration".to_string(),
                }],
            })
        }
    }

    struct BrokenBoards;

    impl StoryboardProvider for BrokenBoards {
        async fn structure(&self, _article: &str) -> Result<Storyboard, CollaboratorError> {
            Err(CollaboratorError::UnexpectedShape("no sections".to_string()))
        }
    }

    struct TouchRenderer;

    impl VideoRenderer for TouchRenderer {
        async fn render(
            &self,
            _storyboard: &Path,
            _illustration: &Path,
            output: &Path,
        ) -> Result<(), CollaboratorError> {
            tokio::fs::write(output, b"video").await?;
            Ok(())
        }
    }

    /// Exits cleanly but never writes the output file.
    struct NoopRenderer;

    impl VideoRenderer for NoopRenderer {
        async fn render(
            &self,
            _storyboard: &Path,
            _illustration: &Path,
            _output: &Path,
        ) -> Result<(), CollaboratorError> {
            Ok(())
        }
    }

    fn story() -> Story {
        Story {
            body: "A story about fusion.".to_string(),
            references: vec!["https://a.example".to_string()],
        }
    }

    fn publisher<I, B>(
        dir: &TempDir,
        images: I,
        boards: B,
    ) -> Publisher<CannedText, I, B, TouchRenderer>
    where
        I: ImageProvider,
        B: StoryboardProvider,
    {
        Publisher::new(
            dir.path().to_path_buf(),
            ProgressBus::default(),
            Arc::new(CannedText),
            Arc::new(images),
            Arc::new(boards),
            Arc::new(TouchRenderer),
        )
    }

    #[tokio::test]
    async fn test_file_essay_writes_markdown() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("publication");

        let path = file_essay(&out, "Fusion Power", &story()).await.unwrap();

        assert!(path.ends_with("fusion_power_essay.md"));
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            content,
            "A story about fusion.\n\n## References\n1. https://a.example\n"
        );
    }

    #[tokio::test]
    async fn test_publish_downgrades_failed_illustration() {
        let tmp = TempDir::new().unwrap();
        let publisher = publisher(&tmp, BrokenImages, CannedBoards);

        let report = publisher
            .publish(Uuid::now_v7(), "Fusion Power", &story())
            .await
            .unwrap();

        assert!(report.illustration.is_none());
        assert!(report.video.is_none());
        assert_eq!(
            report.warnings,
            vec![
                "using default illustration".to_string(),
                "skipped the video: no illustration to render".to_string(),
            ]
        );

        // Essay and storyboard were still written.
        assert!(report.essay.exists());
        let raw = tokio::fs::read_to_string(&report.storyboard).await.unwrap();
        let parsed: Storyboard = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.sections.len(), 1);
    }

    #[tokio::test]
    async fn test_publish_download_failure_is_nonfatal() {
        let tmp = TempDir::new().unwrap();
        let publisher = publisher(&tmp, UnreachableImages, CannedBoards);

        let report = publisher
            .publish(Uuid::now_v7(), "Fusion Power", &story())
            .await
            .unwrap();

        assert!(report.illustration.is_none());
        assert!(report.warnings.iter().any(|w| w.contains("default illustration")));
    }

    #[tokio::test]
    async fn test_publish_storyboard_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let publisher = publisher(&tmp, BrokenImages, BrokenBoards);

        let err = publisher
            .publish(Uuid::now_v7(), "Fusion Power", &story())
            .await
            .unwrap_err();

        match err {
            PublishError::Stage { stage, .. } => assert_eq!(stage, "storyboard"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stage_video_renders_artifact() {
        let tmp = TempDir::new().unwrap();
        let publisher = publisher(&tmp, BrokenImages, CannedBoards);

        let storyboard = tmp.path().join("sb.json");
        let illustration = tmp.path().join("ill.jpg");
        tokio::fs::write(&storyboard, b"{}").await.unwrap();
        tokio::fs::write(&illustration, b"jpg").await.unwrap();
        let dest = tmp.path().join("video.mp4");

        let path = publisher
            .stage_video(&storyboard, &illustration, &dest)
            .await
            .unwrap();

        assert_eq!(path, dest);
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn test_stage_video_missing_artifact_is_detected() {
        let tmp = TempDir::new().unwrap();
        let publisher = Publisher::new(
            tmp.path().to_path_buf(),
            ProgressBus::default(),
            Arc::new(CannedText),
            Arc::new(BrokenImages),
            Arc::new(CannedBoards),
            Arc::new(NoopRenderer),
        );

        let storyboard = tmp.path().join("sb.json");
        let illustration = tmp.path().join("ill.jpg");
        tokio::fs::write(&storyboard, b"{}").await.unwrap();
        tokio::fs::write(&illustration, b"jpg").await.unwrap();

        let err = publisher
            .stage_video(&storyboard, &illustration, &tmp.path().join("video.mp4"))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::ArtifactMissing(_)));
    }

    #[tokio::test]
    async fn test_publish_reports_stage_updates() {
        let tmp = TempDir::new().unwrap();
        let bus = ProgressBus::default();
        let mut rx = bus.subscribe();
        let publisher = Publisher::new(
            tmp.path().to_path_buf(),
            bus,
            Arc::new(CannedText),
            Arc::new(BrokenImages),
            Arc::new(CannedBoards),
            Arc::new(TouchRenderer),
        );

        publisher
            .publish(Uuid::now_v7(), "Fusion Power", &story())
            .await
            .unwrap();

        let mut messages = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let ProgressEvent::StageUpdate { message, .. } = event {
                messages.push(message);
            }
        }

        assert_eq!(messages.first().map(String::as_str), Some("filing the essay"));
        assert_eq!(
            messages.last().map(String::as_str),
            Some("publication complete")
        );
    }

    #[test]
    fn test_illustration_prompt_embeds_article() {
        let prompt = illustration_prompt("THE ARTICLE");
        assert!(prompt.contains("Here is an article: THE ARTICLE."));
        assert!(prompt.contains("anime style"));
        assert!(prompt.ends_with("Your prompt:"));
    }
}
