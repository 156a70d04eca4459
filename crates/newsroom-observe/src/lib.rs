//! Observability setup for Newsroom.

pub mod tracing_setup;

pub use tracing_setup::init_tracing;
