//! Application state wiring configuration and collaborators together.
//!
//! `AppState` holds the loaded configuration and the progress bus. The
//! collaborator constructors pin the generic pipeline and publisher types
//! to the concrete infra implementations, resolving API keys from the
//! environment at construction time.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use newsroom_core::collab::PromptStoryboarder;
use newsroom_core::pipeline::NewsDesk;
use newsroom_core::progress::ProgressBus;
use newsroom_infra::config::{load_config, resolve_config_dir};
use newsroom_infra::llm::openai::{OpenAiImageProvider, OpenAiTextProvider};
use newsroom_infra::publish::Publisher;
use newsroom_infra::search::TavilySearch;
use newsroom_infra::video::CommandRenderer;
use newsroom_types::config::{NewsroomConfig, RunConfig};

/// Environment variable holding the web search API key.
pub const TAVILY_KEY_VAR: &str = "TAVILY_API_KEY";

/// Environment variable holding the text and image model API key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Sampling temperature for the angle-planning model. The planner runs
/// colder than the writer so the angle split stays focused.
const PLANNER_TEMPERATURE: f32 = 0.3;

/// Concrete type aliases pinning the generics to infra implementations.
pub type ConcreteDesk = NewsDesk<TavilySearch, OpenAiTextProvider, OpenAiTextProvider>;

pub type ConcretePublisher = Publisher<
    OpenAiTextProvider,
    OpenAiImageProvider,
    PromptStoryboarder<OpenAiTextProvider>,
    CommandRenderer,
>;

/// Shared application state for CLI commands.
pub struct AppState {
    pub config: NewsroomConfig,
    pub config_dir: PathBuf,
    pub progress: ProgressBus,
}

impl AppState {
    /// Load configuration and prepare the progress bus.
    pub async fn init() -> anyhow::Result<Self> {
        let config_dir = resolve_config_dir();
        let config = load_config(&config_dir).await;

        Ok(Self {
            config,
            config_dir,
            progress: ProgressBus::default(),
        })
    }

    /// Assemble a news desk with the given run limits.
    pub fn desk(&self, run: RunConfig) -> anyhow::Result<ConcreteDesk> {
        let search = Arc::new(TavilySearch::from_config(
            &self.config.search,
            require_key(TAVILY_KEY_VAR)?,
        ));
        let planner = Arc::new(
            OpenAiTextProvider::new(
                require_key(OPENAI_KEY_VAR)?,
                self.config.text.planner_model.clone(),
            )
            .with_base_url(self.config.text.base_url.clone())
            .with_temperature(PLANNER_TEMPERATURE),
        );
        let writer = Arc::new(self.writer()?);

        Ok(NewsDesk::new(
            search,
            planner,
            writer,
            run,
            self.progress.clone(),
        ))
    }

    /// Assemble a publisher writing into `output_dir`.
    pub fn publisher(&self, output_dir: PathBuf) -> anyhow::Result<ConcretePublisher> {
        // The publisher gets its own writer instance; the desk owns one
        // internally.
        let text = Arc::new(self.writer()?);
        let images = Arc::new(OpenAiImageProvider::from_config(
            &self.config.image,
            require_key(OPENAI_KEY_VAR)?,
        ));
        let boards = Arc::new(PromptStoryboarder::new(Arc::clone(&text)));
        let renderer = Arc::new(CommandRenderer::from_config(
            &self.config.video,
            output_dir.clone(),
        ));

        Ok(Publisher::new(
            output_dir,
            self.progress.clone(),
            text,
            images,
            boards,
            renderer,
        ))
    }

    /// The prose-writing text provider, with the configured sampling.
    fn writer(&self) -> anyhow::Result<OpenAiTextProvider> {
        Ok(OpenAiTextProvider::new(
            require_key(OPENAI_KEY_VAR)?,
            self.config.text.model.clone(),
        )
        .with_base_url(self.config.text.base_url.clone())
        .with_temperature(self.config.text.temperature)
        .with_max_tokens(self.config.text.max_tokens))
    }
}

/// Read a required API key from the environment.
pub fn require_key(name: &str) -> anyhow::Result<SecretString> {
    let value = std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .with_context(|| format!("{name} is not set; export it before running"))?;
    Ok(SecretString::from(value))
}

/// Whether an environment key is present (for the status display).
pub fn key_present(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| !value.is_empty())
}
