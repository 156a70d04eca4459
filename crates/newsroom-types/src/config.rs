//! Configuration types for Newsroom.
//!
//! `NewsroomConfig` represents the top-level `newsroom.toml` that controls
//! run limits, collaborator endpoints and models, and the output directory.
//! API keys never live here; they come from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the newsroom pipeline.
///
/// Loaded from `newsroom.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewsroomConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub video: VideoConfig,
}

/// Limits for one workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Deadline for the research workflow, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many editor->writer feedback rounds to run before publishing.
    #[serde(default = "default_refine_rounds")]
    pub max_refine_rounds: u32,

    /// Parallel workers for the angle-research fan-out step.
    #[serde(default = "default_angle_workers")]
    pub angle_workers: usize,

    /// Directory that receives the publication artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_timeout_secs() -> u64 {
    1800
}

fn default_refine_rounds() -> u32 {
    1
}

fn default_angle_workers() -> usize {
    3
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("publication")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_refine_rounds: default_refine_rounds(),
            angle_workers: default_angle_workers(),
            output_dir: default_output_dir(),
        }
    }
}

/// Web-search collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
}

fn default_search_base_url() -> String {
    "https://api.tavily.com".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
        }
    }
}

/// Text-generation collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    #[serde(default = "default_text_base_url")]
    pub base_url: String,

    /// Model used for drafting, editing, and refining.
    #[serde(default = "default_text_model")]
    pub model: String,

    /// Model used for the structured angle-planning call.
    #[serde(default = "default_planner_model")]
    pub planner_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_text_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_planner_model() -> String {
    "o3-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    10_000
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            base_url: default_text_base_url(),
            model: default_text_model(),
            planner_model: default_planner_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Image-generation collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_text_base_url")]
    pub base_url: String,

    #[serde(default = "default_image_model")]
    pub model: String,

    #[serde(default = "default_image_size")]
    pub size: String,
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: default_text_base_url(),
            model: default_image_model(),
            size: default_image_size(),
        }
    }
}

/// Video-rendering collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// External renderer program invoked with the storyboard and
    /// illustration paths.
    #[serde(default = "default_video_program")]
    pub program: String,
}

fn default_video_program() -> String {
    "newsroom-render".to_string()
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            program: default_video_program(),
        }
    }
}
