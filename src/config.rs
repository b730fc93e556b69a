//! Configuration management for the resume ranker

use crate::error::{Result, ResumeRankerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub matching: MatchingConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Keywords retained per document
    pub top_k: usize,
    /// Maximum distinct terms considered corpus-wide
    pub max_vocab: usize,
    /// Embed the full normalized body instead of the keyword summary.
    /// Full text captures more context; keywords are cheaper and
    /// noise-reduced.
    pub embed_full_text: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub batch_size: usize,
    pub max_concurrent_embeds: usize,
    pub embed_timeout_secs: u64,
    pub enable_caching: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub color_output: bool,
    pub detailed: bool,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-ranker")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_model: "potion-base-8M".to_string(),
            },
            matching: MatchingConfig {
                top_k: 20,
                max_vocab: 100,
                embed_full_text: false,
            },
            processing: ProcessingConfig {
                batch_size: 32,
                max_concurrent_embeds: 4,
                embed_timeout_secs: 30,
                enable_caching: true,
            },
            output: OutputConfig {
                color_output: true,
                detailed: false,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            Self::load_from(config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load an explicit config file; unlike `load`, a missing file is an
    /// error rather than a cue to write defaults.
    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(&config_path).map_err(|_| {
            ResumeRankerError::Configuration(format!(
                "Config file not found: {}",
                config_path.display()
            ))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeRankerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Fail fast on out-of-range parameters, before any pipeline work begins.
    pub fn validate(&self) -> Result<()> {
        if self.matching.top_k == 0 {
            return Err(ResumeRankerError::InvalidConfiguration(
                "top_k must be a positive integer".to_string(),
            ));
        }
        if self.matching.max_vocab == 0 {
            return Err(ResumeRankerError::InvalidConfiguration(
                "max_vocab must be a positive integer".to_string(),
            ));
        }
        if self.processing.batch_size == 0 {
            return Err(ResumeRankerError::InvalidConfiguration(
                "batch_size must be a positive integer".to_string(),
            ));
        }
        if self.processing.max_concurrent_embeds == 0 {
            return Err(ResumeRankerError::InvalidConfiguration(
                "max_concurrent_embeds must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    pub fn get_models_dir(&self) -> PathBuf {
        self.models.models_dir.clone()
    }
}
