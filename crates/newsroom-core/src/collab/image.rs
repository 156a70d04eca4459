//! Image generation abstraction.

use std::future::Future;

use newsroom_types::error::CollaboratorError;

/// An image model that renders a textual prompt into a hosted image.
pub trait ImageProvider: Send + Sync {
    /// Generate one image and return the URL it can be downloaded from.
    ///
    /// The URL is typically short-lived, so callers should download
    /// promptly rather than store it.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, CollaboratorError>> + Send;
}
