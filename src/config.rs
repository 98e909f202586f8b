use crate::error::{Result, SubzhError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Delay inserted between consecutive API requests, in milliseconds.
const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub model: String,
    pub request_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("SUBZH_MODEL") {
            config.model = model;
        }
        if let Ok(delay) = std::env::var("SUBZH_REQUEST_DELAY_MS") {
            if let Ok(d) = delay.parse() {
                config.request_delay_ms = d;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.is_none() {
            return Err(SubzhError::Config(
                "GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(SubzhError::Config("Model name must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let toml_content = toml::to_string_pretty(self)
                .map_err(|e| SubzhError::Config(format!("Failed to serialize config: {}", e)))?;
            std::fs::write(config_path, toml_content)?;
        }
        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subzh").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.request_delay_ms, 500);
    }

    #[test]
    fn test_validate_missing_api_key() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_with_api_key() {
        let mut config = Config::default();
        config.gemini_api_key = Some("test-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = Config::default();
        config.gemini_api_key = Some("test-key".to_string());
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = Config::default();
        config.gemini_api_key = Some("test-key".to_string());

        let toml_content = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_content).unwrap();
        assert_eq!(parsed.gemini_api_key.as_deref(), Some("test-key"));
        assert_eq!(parsed.model, config.model);
    }
}
