//! Configuration management for bmi-advisor
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.bmi-advisor/config.toml

use crate::advice::client::{AdviceClient, DEFAULT_ADVICE_URL, DEFAULT_MODEL};
use crate::advice::formatter::{AdviceFormatter, DEFAULT_SECTION_TITLES};
use crate::advice::prompt::{PromptBuilder, DEFAULT_SYSTEM_PROMPT};
use crate::errors::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the advice API key
pub const API_KEY_ENV: &str = "BMI_ADVISOR_API_KEY";

/// Complete configuration for bmi-advisor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub advice: AdviceConfig,
    #[serde(default)]
    pub formatter: FormatterConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Advice endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub system_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Advice formatter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub section_titles: Vec<String>,
}

/// Terminal display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
    pub show_progress: bool,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ADVICE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            max_tokens: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            api_key: None,
        }
    }
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            section_titles: DEFAULT_SECTION_TITLES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            show_progress: true,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AdvisorError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AdvisorError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".bmi-advisor").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.advice.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AdvisorError::ConfigError(format!(
                "advice.endpoint must be an http(s) URL, got '{}'",
                self.advice.endpoint
            )));
        }

        if self.advice.model.trim().is_empty() {
            return Err(AdvisorError::ConfigError(
                "advice.model must not be empty".to_string(),
            ));
        }

        if self.advice.timeout_secs == 0 {
            return Err(AdvisorError::ConfigError(
                "advice.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.formatter.section_titles.iter().any(|t| t.trim().is_empty()) {
            return Err(AdvisorError::ConfigError(
                "formatter.section_titles must not contain blank entries".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.advice.api_key = Some(key);
        }
    }

    /// Apply process environment overrides; call once at startup
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, endpoint: Option<String>, model: Option<String>) {
        if let Some(endpoint) = endpoint {
            self.advice.endpoint = endpoint;
        }
        if let Some(model) = model {
            self.advice.model = model;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AdvisorError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AdvisorError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AdvisorError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Copy of this configuration safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.advice.api_key.is_some() {
            copy.advice.api_key = Some("********".to_string());
        }
        copy
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AdvisorError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.advice.timeout_secs)
    }

    /// Formatter using the configured section titles
    pub fn build_formatter(&self) -> Result<AdviceFormatter> {
        AdviceFormatter::with_section_titles(self.formatter.section_titles.iter().cloned())
    }

    /// Advice client using the configured endpoint, model and prompts
    pub fn build_client(&self) -> Result<AdviceClient> {
        let prompts = PromptBuilder::new()
            .with_system_prompt(self.advice.system_prompt.clone())
            .with_sections(&self.formatter.section_titles);

        Ok(AdviceClient::with_config(
            self.advice.endpoint.trim(),
            self.advice.model.trim(),
            self.timeout(),
        )?
        .with_api_key(self.advice.api_key.clone())
        .with_max_tokens(self.advice.max_tokens)
        .with_prompts(prompts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.advice.model, DEFAULT_MODEL);
        assert_eq!(config.advice.timeout_secs, 60);
        assert_eq!(config.formatter.section_titles.len(), 6);
        assert!(config.display.color_output);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_endpoint() {
        let mut config = Config::default();
        config.advice.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_model() {
        let mut config = Config::default();
        config.advice.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_timeout() {
        let mut config = Config::default();
        config.advice.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_blank_title() {
        let mut config = Config::default();
        config.formatter.section_titles.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[advice]\nmodel = \"llama3\"\n").unwrap();
        assert_eq!(config.advice.model, "llama3");
        assert_eq!(config.advice.endpoint, DEFAULT_ADVICE_URL);
        assert!(config.display.show_progress);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.advice.max_tokens = Some(800);
        config.formatter.section_titles = vec!["Summary".to_string()];
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[advice]\ntimeout_secs = 0\n").unwrap();
        assert!(Config::load_from_file(&path).is_err());
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env_with(|key| (key == API_KEY_ENV).then(|| "sk-env".to_string()));
        assert_eq!(config.advice.api_key.as_deref(), Some("sk-env"));

        config.apply_env_with(|_| Some("   ".to_string()));
        assert_eq!(config.advice.api_key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("http://localhost:1".to_string()), None);
        assert_eq!(config.advice.endpoint, "http://localhost:1");
        assert_eq!(config.advice.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut config = Config::default();
        config.advice.api_key = Some("secret".to_string());
        let text = config.redacted().to_toml().unwrap();
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_build_client_and_formatter() {
        let config = Config::default();
        let client = config.build_client().unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        let formatter = config.build_formatter().unwrap();
        assert_eq!(formatter.section_titles().len(), 6);
    }
}
