mod api;

use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::ApiConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { verbose: None }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            default_model: None,
        }
    }
}

pub struct Config {
    pub api_key: String,
    pub organization: Option<String>,
    pub api_endpoint: String,
    pub model: String,
    pub stream_timeout: u64,
    pub request_timeout: u64,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self, String> {
        // Load file configuration first
        let file_config = FileConfig::load().unwrap_or_default();

        // API key is required from env var (never from a config file)
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| "OPENAI_API_KEY environment variable not set")?;

        let organization = env::var("OPENAI_ORG_ID").ok();

        // API endpoint: CLI args > env var > file config > default
        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env::var("R3ASON_API_ENDPOINT").ok())
            .or(file_config.api.endpoint.clone())
            .map(normalize_endpoint)
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string());

        // Model: env var > file config > default
        let model = env::var("R3ASON_MODEL")
            .ok()
            .or(file_config.model.default_model.clone())
            .unwrap_or_else(|| "gpt-4o-2024-08-06".to_string());

        // Stream timeout: env var > file config > default
        let stream_timeout = env::var("R3ASON_STREAM_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.stream_timeout)
            .unwrap_or(30);

        // Buffered request deadline: env var > file config > default
        let request_timeout = env::var("R3ASON_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.request_timeout)
            .unwrap_or(120);

        // Verbose flag: env var > file config > default
        let verbose = env::var("R3ASON_VERBOSE")
            .ok()
            .map(|v| v == "true")
            .or(file_config.session.verbose)
            .unwrap_or(false);

        Ok(Config {
            api_key,
            organization,
            api_endpoint,
            model,
            stream_timeout,
            request_timeout,
            verbose,
        })
    }
}

/// Normalize an endpoint so it always ends in `/chat/completions`.
pub fn normalize_endpoint(endpoint: String) -> String {
    if endpoint.ends_with("/chat/completions") {
        endpoint
    } else if endpoint.ends_with("/v1") {
        format!("{}/chat/completions", endpoint)
    } else if endpoint.ends_with("/v1/") {
        format!("{}chat/completions", endpoint)
    } else {
        // Assume it's a base URL without /v1
        format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'))
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        let config_paths = Self::get_config_paths();

        for path in config_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // Try YAML first, then fall back to JSON
        let config: FileConfig = if matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        ) {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory (highest priority - local override)
        paths.push(PathBuf::from(".r3ason.yaml"));
        paths.push(PathBuf::from(".r3ason.yml"));
        paths.push(PathBuf::from(".r3ason.json"));

        // 2. User's config directory (global config)
        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("r3ason");
            paths.push(config_dir.join("r3ason.yaml"));
            paths.push(config_dir.join("r3ason.yml"));
            paths.push(config_dir.join("r3ason.json"));
        }

        paths
    }
}
