use thiserror::Error;

/// Errors from external collaborators (search, text generation, image
/// generation, video rendering).
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("authentication failed (check the API key)")]
    AuthenticationFailed,

    #[error("rate limited by the provider")]
    RateLimited,

    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("renderer exited with {status}: {detail}")]
    RendererFailed { status: String, detail: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from writing or assembling publication artifacts.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("illustration download failed: {0}")]
    Download(String),

    #[error("artifact encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: CollaboratorError,
    },

    #[error("expected artifact missing: {0}")]
    ArtifactMissing(String),
}

/// Violations of the storyboard content limits.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("storyboard has no sections")]
    Empty,

    #[error("storyboard has {count} sections (limit {limit})")]
    TooManySections { count: usize, limit: usize },

    #[error("section title '{title}' exceeds {limit} words")]
    TitleTooLong { title: String, limit: usize },
}
