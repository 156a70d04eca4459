//! CommandRenderer -- [`VideoRenderer`] implementation that shells out to
//! an external rendering program.
//!
//! The renderer is invoked as
//! `<program> --storyboard <path> --illustration <path> --output <path>`
//! in the publication working directory. Two quirks of the stock renderer
//! are handled here rather than leaking to callers:
//!
//! - it leaves `media/` and `slides/` scratch directories behind, which
//!   are removed after every invocation, success or not;
//! - it sometimes exits non-zero after writing a perfectly good video, so
//!   a reported error with the output artifact present on disk is treated
//!   as success.

use std::path::{Path, PathBuf};

use newsroom_core::collab::VideoRenderer;
use newsroom_types::config::VideoConfig;
use newsroom_types::error::CollaboratorError;

/// Scratch directories the renderer creates next to its working directory.
const SCRATCH_DIRS: &[&str] = &["media", "slides"];

/// Video renderer that spawns an external program per render.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    workdir: PathBuf,
}

impl CommandRenderer {
    /// Create a renderer invoking `program` from `workdir`.
    pub fn new(program: String, workdir: PathBuf) -> Self {
        Self { program, workdir }
    }

    /// Create a renderer from configuration, working in `workdir`.
    pub fn from_config(config: &VideoConfig, workdir: PathBuf) -> Self {
        Self::new(config.program.clone(), workdir)
    }

    /// Run the renderer once and map its exit status.
    async fn invoke(
        &self,
        storyboard: &Path,
        illustration: &Path,
        output: &Path,
    ) -> Result<(), CollaboratorError> {
        tracing::debug!(
            program = %self.program,
            storyboard = %storyboard.display(),
            "invoking video renderer"
        );

        let result = tokio::process::Command::new(&self.program)
            .arg("--storyboard")
            .arg(storyboard)
            .arg("--illustration")
            .arg(illustration)
            .arg("--output")
            .arg(output)
            .current_dir(&self.workdir)
            .output()
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(CollaboratorError::RendererFailed {
                status: result.status.to_string(),
                detail: stderr.trim().to_string(),
            });
        }

        Ok(())
    }

    /// Remove the renderer's scratch directories. Missing directories are
    /// fine; anything else is logged and ignored.
    async fn clean_scratch(&self) {
        for dir in SCRATCH_DIRS {
            let path = self.workdir.join(dir);
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => {
                    tracing::debug!(dir = %path.display(), "removed renderer scratch directory");
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(
                        dir = %path.display(),
                        error = %err,
                        "failed to remove renderer scratch directory"
                    );
                }
            }
        }
    }
}

impl VideoRenderer for CommandRenderer {
    async fn render(
        &self,
        storyboard: &Path,
        illustration: &Path,
        output: &Path,
    ) -> Result<(), CollaboratorError> {
        let outcome = self.invoke(storyboard, illustration, output).await;

        // Scratch cleanup happens whether or not the render worked.
        self.clean_scratch().await;

        match outcome {
            Ok(()) => Ok(()),
            Err(err) => {
                if tokio::fs::try_exists(output).await.unwrap_or(false) {
                    tracing::warn!(
                        error = %err,
                        output = %output.display(),
                        "renderer reported an error but left a video artifact, keeping it"
                    );
                    Ok(())
                } else {
                    Err(err)
                }
            }
        }
    }
}
