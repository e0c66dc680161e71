//! Configuration management for pdfchat
//!
//! Handles model selection and persistence of user preferences.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Chat models the completion endpoint accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ChatModel {
    /// GPT-3.5 Turbo - cheap and fast (default)
    Gpt35Turbo,
    /// GPT-4 - higher quality, slower
    Gpt4,
    /// GPT-4 Turbo - large context window
    Gpt4Turbo,
    /// GPT-4o - multimodal flagship
    Gpt4o,
}

impl ChatModel {
    /// Model identifier sent in the request body.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::Gpt4 => "gpt-4",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Gpt4o => "gpt-4o",
        }
    }

    /// Context window in tokens.
    pub fn context_window(&self) -> usize {
        match self {
            Self::Gpt35Turbo => 16_385,
            Self::Gpt4 => 8_192,
            Self::Gpt4Turbo => 128_000,
            Self::Gpt4o => 128_000,
        }
    }

    /// Get all available models
    pub fn all() -> Vec<Self> {
        vec![Self::Gpt35Turbo, Self::Gpt4, Self::Gpt4Turbo, Self::Gpt4o]
    }
}

impl Default for ChatModel {
    fn default() -> Self {
        Self::Gpt35Turbo
    }
}

/// pdfchat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model used to answer questions
    #[serde(default)]
    pub model: ChatModel,
    /// Sampling temperature; low to keep answers grounded in the document
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Character budget for document text embedded in a prompt
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
    /// Scale applied when rendering page geometry
    #[serde(default = "default_render_scale")]
    pub render_scale: f32,
    /// Version of config schema (for future migrations)
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_context_chars() -> usize {
    crate::prompt::MAX_CONTEXT_CHARS
}

fn default_render_scale() -> f32 {
    1.5
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ChatModel::default(),
            temperature: default_temperature(),
            max_context_chars: default_max_context_chars(),
            render_scale: default_render_scale(),
            version: default_version(),
        }
    }
}

impl Config {
    /// Get the config file path (~/.pdfchat/config.toml)
    pub fn path() -> Result<PathBuf> {
        Ok(pdfchat_dir()?.join("config.toml"))
    }

    /// Check if config exists (i.e., not first run)
    pub fn exists() -> bool {
        Self::path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Load config from disk, or return None if it doesn't exist
    pub fn load() -> Result<Option<Self>> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(Some(config))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;

        Ok(())
    }
}

/// Get the base pdfchat directory path (~/.pdfchat)
pub fn pdfchat_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".pdfchat"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, ChatModel::Gpt35Turbo);
        assert_eq!(config.max_context_chars, 8_000);
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_model_metadata() {
        let model = ChatModel::Gpt4Turbo;
        assert_eq!(model.name(), "gpt-4-turbo");
        assert_eq!(model.context_window(), 128_000);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.model, parsed.model);
        assert_eq!(config.max_context_chars, parsed.max_context_chars);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("model = \"Gpt4\"").unwrap();
        assert_eq!(parsed.model, ChatModel::Gpt4);
        assert_eq!(parsed.max_context_chars, 8_000);
        assert_eq!(parsed.version, 1);
    }
}
