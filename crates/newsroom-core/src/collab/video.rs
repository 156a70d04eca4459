//! Video rendering abstraction.

use std::future::Future;
use std::path::Path;

use newsroom_types::error::CollaboratorError;

/// Renders a storyboard plus an illustration into a video file.
///
/// Implementations are expected to leave a playable file at `output` on
/// success. The stock implementation shells out to an external renderer;
/// see `newsroom-infra` for its artifact-trusting failure policy.
pub trait VideoRenderer: Send + Sync {
    fn render(
        &self,
        storyboard: &Path,
        illustration: &Path,
        output: &Path,
    ) -> impl Future<Output = Result<(), CollaboratorError>> + Send;
}
