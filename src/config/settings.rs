//! Configuration settings for Svar.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub records: RecordsSettings,
    pub agent: AgentSettings,
    pub slack: SlackSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Student-records service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsSettings {
    /// Base URL of the student-records HTTP service.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for RecordsSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Agent loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// LLM model driving tool selection.
    pub model: String,
    /// Maximum tool-selection rounds before the agent must answer.
    pub max_iterations: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_iterations: 4,
        }
    }
}

/// Slack events listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSettings {
    /// Host to bind the events listener to.
    pub host: String,
    /// Port to bind the events listener to.
    pub port: u16,
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SvarError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("svar")
            .join("config.toml")
    }

    /// Read the Slack bot token from the environment.
    ///
    /// The token authenticates Web API calls (chat.postMessage). It is never
    /// written to the config file or logged.
    pub fn slack_bot_token() -> crate::error::Result<String> {
        match std::env::var("SLACK_BOT_TOKEN") {
            Ok(token) if !token.is_empty() => Ok(token),
            _ => Err(crate::error::SvarError::Config(
                "SLACK_BOT_TOKEN not set. Set it with: export SLACK_BOT_TOKEN='xoxb-...'"
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.records.base_url, "http://localhost:8081");
        assert_eq!(settings.agent.max_iterations, 4);
        assert_eq!(settings.slack.port, 3000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [agent]
            model = "gpt-4.1"
            "#,
        )
        .unwrap();
        assert_eq!(settings.agent.model, "gpt-4.1");
        assert_eq!(settings.agent.max_iterations, 4);
        assert_eq!(settings.records.timeout_seconds, 10);
    }
}
