//! OpenAiImageProvider -- concrete [`ImageProvider`] implementation for the
//! OpenAI image generations API.
//!
//! Requests a single hosted image from `/images/generations` and returns
//! its URL. The URL expires quickly, so callers download immediately.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use newsroom_core::collab::ImageProvider;
use newsroom_types::config::ImageConfig;
use newsroom_types::error::CollaboratorError;

use super::map_status;
use super::types::{ImageRequest, ImageResponse};

/// Render quality requested from the API.
const IMAGE_QUALITY: &str = "standard";

/// OpenAI image generations provider.
pub struct OpenAiImageProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    size: String,
}

impl OpenAiImageProvider {
    /// Create a new provider for `model` at the default 1024x1024 size.
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // image generation is slow
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model,
            size: "1024x1024".to_string(),
        }
    }

    /// Create a provider from configuration.
    pub fn from_config(config: &ImageConfig, api_key: SecretString) -> Self {
        Self::new(api_key, config.model.clone())
            .with_base_url(config.base_url.clone())
            .with_size(config.size.clone())
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Override the image size (`"1024x1024"` etc.).
    pub fn with_size(mut self, size: String) -> Self {
        self.size = size;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build an [`ImageRequest`] for one image from `prompt`.
    fn image_request(&self, prompt: &str) -> ImageRequest {
        ImageRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.size.clone(),
            quality: IMAGE_QUALITY.to_string(),
        }
    }
}

// OpenAiImageProvider intentionally does NOT derive Debug to prevent
// accidental exposure of internal state. Same defense-in-depth pattern as
// OpenAiTextProvider.

impl ImageProvider for OpenAiImageProvider {
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError> {
        let body = self.image_request(prompt);
        let url = self.url("/images/generations");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(format!("image request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status, error_body));
        }

        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::UnexpectedShape(format!("image response: {e}")))?;

        parsed
            .data
            .into_iter()
            .next()
            .and_then(|datum| datum.url)
            .ok_or_else(|| {
                CollaboratorError::UnexpectedShape(
                    "image response had no hosted URL".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> OpenAiImageProvider {
        OpenAiImageProvider::new(
            SecretString::from("test-key-not-real"),
            "dall-e-3".to_string(),
        )
    }

    #[test]
    fn test_default_base_url() {
        let provider = make_provider();
        assert_eq!(
            provider.url("/images/generations"),
            "https://api.openai.com/v1/images/generations"
        );
    }

    #[test]
    fn test_image_request_asks_for_one_standard_image() {
        let provider = make_provider();
        let request = provider.image_request("an anime style newsroom at night");

        assert_eq!(request.model, "dall-e-3");
        assert_eq!(request.n, 1);
        assert_eq!(request.size, "1024x1024");
        assert_eq!(request.quality, "standard");
        assert_eq!(request.prompt, "an anime style newsroom at night");
    }

    #[test]
    fn test_from_config_applies_overrides() {
        let config = ImageConfig {
            base_url: "http://localhost:8089/v1".to_string(),
            model: "dall-e-2".to_string(),
            size: "512x512".to_string(),
        };
        let provider = OpenAiImageProvider::from_config(&config, SecretString::from("k"));

        assert_eq!(
            provider.url("/images/generations"),
            "http://localhost:8089/v1/images/generations"
        );
        let request = provider.image_request("p");
        assert_eq!(request.model, "dall-e-2");
        assert_eq!(request.size, "512x512");
    }
}
