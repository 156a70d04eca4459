//! Web search collaborators.

pub mod tavily;

pub use tavily::TavilySearch;
