//! Configuration loader for Newsroom.
//!
//! Reads `newsroom.toml` from the config directory and deserializes it into
//! [`NewsroomConfig`]. Falls back to defaults when the file is missing or
//! malformed. API keys never live in the file; they come from the
//! environment (see `newsroom-api`).

use std::path::{Path, PathBuf};

use newsroom_types::config::NewsroomConfig;

/// File name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "newsroom.toml";

/// Load configuration from `{config_dir}/newsroom.toml`.
///
/// - If the file does not exist, returns [`NewsroomConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(config_dir: &Path) -> NewsroomConfig {
    let config_path = config_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No newsroom.toml found at {}, using defaults",
                config_path.display()
            );
            return NewsroomConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return NewsroomConfig::default();
        }
    };

    match toml::from_str::<NewsroomConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            NewsroomConfig::default()
        }
    }
}

/// Resolve the configuration directory from environment or platform defaults.
///
/// Priority:
/// 1. `NEWSROOM_CONFIG_DIR` environment variable
/// 2. Platform config directory (e.g. `~/.config/newsroom` on Linux)
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NEWSROOM_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(base) = dirs::config_dir() {
        return base.join("newsroom");
    }

    // Last resort: current directory
    PathBuf::from(".newsroom")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.run.timeout_secs, 1800);
        assert_eq!(config.run.max_refine_rounds, 1);
        assert_eq!(config.run.angle_workers, 3);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        tokio::fs::write(
            &config_path,
            r#"
[run]
timeout_secs = 600
max_refine_rounds = 2

[text]
model = "gpt-4o"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.run.timeout_secs, 600);
        assert_eq!(config.run.max_refine_rounds, 2);
        // Unset fields keep their defaults.
        assert_eq!(config.run.angle_workers, 3);
        assert_eq!(config.text.model, "gpt-4o");
        assert_eq!(config.text.planner_model, "o3-mini");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.run.timeout_secs, 1800);
        assert_eq!(config.text.model, "gpt-4o-mini");
    }

    #[test]
    fn resolve_config_dir_prefers_env_var() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("NEWSROOM_CONFIG_DIR", "/tmp/newsroom-test-config");
        }
        let dir = resolve_config_dir();
        unsafe {
            std::env::remove_var("NEWSROOM_CONFIG_DIR");
        }
        assert_eq!(dir, PathBuf::from("/tmp/newsroom-test-config"));
    }
}
