use std::sync::Arc;

use crate::config::{Config, LlmConfig};
use crate::store::DocumentStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<DocumentStore>,
    pub http_client: reqwest::Client,
    pub llm_config: Arc<LlmConfig>,
    pub llm_semaphore: Arc<tokio::sync::Semaphore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = DocumentStore::open_or_create(&config.data_dir)?;
        tracing::info!("Loaded {} recipes from {}", store.len(), config.data_dir.display());

        let llm_config = config.llm.clone();
        let max_concurrent_llm = config.max_concurrent_llm;

        Ok(Self {
            config,
            store: Arc::new(store),
            http_client: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(llm_config.timeout_secs))
                .build()?,
            llm_config: Arc::new(llm_config),
            llm_semaphore: Arc::new(tokio::sync::Semaphore::new(max_concurrent_llm)),
        })
    }

    /// Flush the store before the process exits.
    pub fn shutdown(&self) -> anyhow::Result<()> {
        self.store.flush()?;
        tracing::info!("Recipe store flushed");
        Ok(())
    }
}
