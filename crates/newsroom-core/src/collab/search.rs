//! Web search abstraction.

use std::future::Future;

use newsroom_types::content::SourceExcerpt;
use newsroom_types::error::CollaboratorError;

/// A search engine returning content excerpts with their source URLs.
pub trait SearchProvider: Send + Sync {
    /// Run one query and return its excerpts in relevance order.
    ///
    /// An empty result list is valid; obscure angles sometimes turn up
    /// nothing and the pipeline carries on with what it has.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SourceExcerpt>, CollaboratorError>> + Send;
}
