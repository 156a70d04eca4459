//! OpenAI provider implementation.
//!
//! This module provides [`OpenAiTextProvider`] (chat completions, free-form
//! and JSON-constrained) and [`OpenAiImageProvider`] (image generations),
//! implementing the [`TextProvider`](newsroom_core::collab::TextProvider)
//! and [`ImageProvider`](newsroom_core::collab::ImageProvider) traits.
//! Both speak to any endpoint that is wire-compatible with the OpenAI API
//! via a configurable base URL.

pub mod client;
pub mod images;
pub mod types;

pub use client::OpenAiTextProvider;
pub use images::OpenAiImageProvider;

use newsroom_types::error::CollaboratorError;

/// Map a non-success HTTP status plus its body to a collaborator error.
///
/// Shared by the text and image clients; both hit the same API surface and
/// get the same status semantics back.
pub(super) fn map_status(status: reqwest::StatusCode, body: String) -> CollaboratorError {
    match status.as_u16() {
        401 | 403 => CollaboratorError::AuthenticationFailed,
        429 => CollaboratorError::RateLimited,
        _ => CollaboratorError::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}
