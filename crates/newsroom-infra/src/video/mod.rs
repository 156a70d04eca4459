//! Video rendering collaborators.

pub mod command;

pub use command::CommandRenderer;
