//! Core engine and editorial pipeline for Newsroom.
//!
//! This crate has two layers. The `engine` module is a generic event-driven
//! workflow engine: typed events are routed to registered steps, steps run
//! concurrently under per-step worker bounds, and a run ends when a step
//! emits the terminal event kind. The `pipeline` module builds the concrete
//! editorial workflow (research, drafting, editing) on top of the engine,
//! with external collaborators abstracted behind the traits in `collab`.
//!
//! Infrastructure concerns (HTTP clients, filesystem publishing, process
//! spawning) live in `newsroom-infra`; this crate only defines the traits
//! those implementations fill in.

pub mod collab;
pub mod engine;
pub mod pipeline;
pub mod progress;
