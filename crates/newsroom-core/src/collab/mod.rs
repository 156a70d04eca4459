//! Collaborator abstractions for external services.
//!
//! The pipeline talks to search engines, language models, image models,
//! and the video renderer exclusively through these traits. All of them
//! use native async fn in traits (Rust 2024 edition); implementations
//! live in `newsroom-infra`, with in-memory fakes used in tests.

pub mod image;
pub mod search;
pub mod storyboard;
pub mod text;
pub mod video;

pub use image::ImageProvider;
pub use search::SearchProvider;
pub use storyboard::{PromptStoryboarder, StoryboardProvider};
pub use text::TextProvider;
pub use video::VideoRenderer;
