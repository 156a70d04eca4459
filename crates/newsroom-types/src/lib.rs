//! Shared domain types for Newsroom.
//!
//! This crate contains the types passed between the workflow engine, the
//! pipeline steps, and the publication layer: events, research content,
//! run records, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod content;
pub mod error;
pub mod event;
pub mod progress;
pub mod run;
