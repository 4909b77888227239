use crate::constants::{
    DEFAULT_MAX_WORDS, DEFAULT_MODEL_TIMEOUT_SECS, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL,
    SUPPORTED_EXTENSIONS,
};
use crate::models::{SummaryOptions, SummaryStyle};
use crate::utils;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    #[serde(default)]
    pub style: SummaryStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_ollama_url() -> String {
    DEFAULT_OLLAMA_URL.to_string()
}

fn default_ollama_model() -> String {
    DEFAULT_OLLAMA_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_MODEL_TIMEOUT_SECS
}

fn default_max_words() -> usize {
    DEFAULT_MAX_WORDS
}

fn default_allowed_extensions() -> Vec<String> {
    SUPPORTED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            model: default_ollama_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
            style: SummaryStyle::default(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Load configuration from the default locations or return defaults
    ///
    /// Environment overrides are applied either way.
    pub fn load() -> Result<Self> {
        let default_paths = [
            "config/settings.toml",
            "./config/settings.toml",
            "~/.config/docsum/settings.toml",
        ];

        let mut config = None;
        for raw in default_paths {
            let path = PathBuf::from(shellexpand::tilde(raw).as_ref());
            if path.exists() {
                config = Some(Self::from_file(&path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_default();
        config.apply_env();
        Ok(config)
    }

    /// Override the Ollama endpoint from `OLLAMA_BASE_URL` and `OLLAMA_MODEL`
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("OLLAMA_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.ollama.url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL").filter(|v| !v.trim().is_empty()) {
            self.ollama.model = model;
        }
    }

    /// Whether `filename` has an extension on the upload allow-list
    pub fn is_allowed(&self, filename: &str) -> bool {
        let extension = utils::get_extension(Path::new(filename));
        !extension.is_empty()
            && self
                .upload
                .allowed_extensions
                .iter()
                .any(|allowed| utils::normalize_extension(allowed) == extension)
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            max_words: self.summary.max_words.max(1),
            style: self.summary.style,
        }
    }
}
