//! Configuration management for filescope

use crate::error::{FilescopeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub text_model: String,
    pub vision_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Previous user/assistant turns sent along with a new message.
    pub history_window: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub pdf_page_limit: usize,
    pub pdf_preview_chars: usize,
    pub text_preview_chars: usize,
    pub color_cap: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub include_payload: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                text_model: "gpt-4o".to_string(),
                vision_model: "gpt-4o".to_string(),
                max_tokens: 1000,
                temperature: 0.7,
                history_window: 5,
                timeout_secs: 120,
            },
            analysis: AnalysisConfig {
                pdf_page_limit: 5,
                pdf_preview_chars: 600,
                text_preview_chars: 500,
                color_cap: 256 * 256 * 256,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                include_payload: false,
            },
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`. A missing
    /// file is created with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| FilescopeError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| FilescopeError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("filescope")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.analysis.pdf_page_limit == 0 {
            return Err(FilescopeError::Configuration(
                "analysis.pdf_page_limit must be at least 1".to_string(),
            ));
        }
        if self.backend.base_url.trim().is_empty() {
            return Err(FilescopeError::Configuration(
                "backend.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
