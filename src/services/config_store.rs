// Configuration Storage Service
// Loads config.json and applies environment overrides

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use super::providers::{OPENAI_DEFAULT_MODEL, OPENAI_RESPONSES_URL};

/// Value shipped in sample env files; never a real credential
const PLACEHOLDER_API_KEY: &str = "YOUR_KEY_HERE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl AssistantConfig {
    /// The credential, unless it is blank or the sample placeholder
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_model() -> String { OPENAI_DEFAULT_MODEL.to_string() }
fn default_base_url() -> String { OPENAI_RESPONSES_URL.to_string() }
fn default_timeout_secs() -> u64 { 80 }

pub struct ConfigStore {
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("misinfo-risk"))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }
}

/// First non-blank value among the given environment variables
fn env_value(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

impl AppConfig {
    /// Apply process environment on top of file values
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(port) = env_value(&["PORT"]).and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(host) = env_value(&["MISINFO_RISK_HOST"]) {
            self.server.host = host;
        }
        if let Some(model) = env_value(&["MISINFO_RISK_MODEL"]) {
            self.assistant.model = model;
        }
        if let Some(url) = env_value(&["OPENAI_API_URL"]) {
            self.assistant.base_url = url;
        }
        if let Some(key) = env_value(&["OPENAI_API_KEY", "MISINFO_RISK_OPENAI_API_KEY"]) {
            self.assistant.api_key = Some(key);
        }
        self
    }

    /// Config file (if any) plus environment overrides
    pub fn resolve() -> Result<Self, String> {
        let from_file = match ConfigStore::default_config_dir() {
            Some(dir) => ConfigStore::new(dir).load()?,
            None => AppConfig::default(),
        };
        Ok(from_file.with_env_overrides())
    }
}
