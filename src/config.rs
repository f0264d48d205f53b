use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the recipe collection is stored
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Maximum concurrent requests to the LLM
    pub max_concurrent_llm: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama", "openai" or "azure"
    pub provider: String,
    /// Base URL for the LLM API (the resource endpoint for azure)
    pub base_url: String,
    /// Model name; the deployment name for azure
    pub chat_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// API version query parameter, azure only
    pub api_version: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:8000".to_string(),
            llm: LlmConfig::default(),
            max_concurrent_llm: 3,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llava".to_string(),
            api_key: None,
            api_version: "2024-02-15-preview".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("MEALMATE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("MEALMATE_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(val) = std::env::var("MEALMATE_MAX_CONCURRENT_LLM") {
            if let Ok(v) = val.parse::<usize>() {
                config.max_concurrent_llm = v.max(1);
            }
        }

        // Azure-style variables select the azure provider
        if let Ok(endpoint) = std::env::var("AZURE_OPENAI_ENDPOINT") {
            config.llm.provider = "azure".to_string();
            config.llm.base_url = endpoint;
        }
        if let Ok(deployment) = std::env::var("AZURE_OPENAI_DEPLOYMENT") {
            config.llm.chat_model = deployment;
        }
        if let Ok(version) = std::env::var("AZURE_OPENAI_API_VERSION") {
            config.llm.api_version = version;
        }
        if let Ok(key) = std::env::var("AZURE_OPENAI_API_KEY") {
            config.llm.api_key = Some(key);
        }

        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(version) = std::env::var("LLM_API_VERSION") {
            config.llm.api_version = version;
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.llm.timeout_secs = v;
            }
        }

        config
    }
}
