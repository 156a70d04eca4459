//! Publication output.
//!
//! Turns a completed run's story into filesystem artifacts: the essay
//! markdown, an illustration, the storyboard JSON, and the rendered video.

pub mod publication;
pub mod publisher;

pub use publication::{slugify, Publication};
pub use publisher::{PublicationReport, Publisher};
