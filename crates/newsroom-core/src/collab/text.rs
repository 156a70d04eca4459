//! Text generation abstraction.

use std::future::Future;

use newsroom_types::error::CollaboratorError;
use serde_json::Value;

/// A text model used for planning, drafting, and editing prose.
///
/// Providers are constructed with their model, temperature, and token
/// budget already fixed; callers only supply prompts. The pipeline holds
/// separate instances where it needs different sampling behavior (the
/// research planner runs colder than the writer).
pub trait TextProvider: Send + Sync {
    /// Complete a prompt into free-form prose.
    fn complete(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, CollaboratorError>> + Send;

    /// Complete a prompt into a JSON object.
    ///
    /// The provider requests a JSON response from the model and parses it;
    /// a response that is not valid JSON is an `UnexpectedShape` error.
    fn complete_structured(
        &self,
        system: Option<&str>,
        prompt: &str,
    ) -> impl Future<Output = Result<Value, CollaboratorError>> + Send;
}
