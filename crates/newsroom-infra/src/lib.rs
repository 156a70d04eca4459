//! Infrastructure layer for Newsroom.
//!
//! Contains implementations of the collaborator traits defined in
//! `newsroom-core`: Tavily web search, OpenAI-compatible text and image
//! generation, the external video renderer, plus configuration loading
//! and publication output.

pub mod config;
pub mod llm;
pub mod publish;
pub mod search;
pub mod video;
