//! Text and image generation collaborators.
//!
//! Contains concrete implementations of the [`TextProvider`] and
//! [`ImageProvider`] traits defined in `newsroom-core`, currently for the
//! OpenAI API and anything wire-compatible with it.

pub mod openai;
