//! Remote configuration fetched once per process.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// HTTP connect timeout for the configuration fetch.
const CONFIG_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP total timeout for the configuration fetch.
const CONFIG_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of settings that may live outside the action inputs.
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Webhook URL to use when none is given as input.
    async fn webhook_url(&self) -> Option<String>;
}

/// Provider used when no configuration URL is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemoteConfig;

#[async_trait]
impl ConfigurationProvider for NoRemoteConfig {
    async fn webhook_url(&self) -> Option<String> {
        None
    }
}

/// Remote configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfiguration {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Default)]
struct CacheState {
    initialized: bool,
    value: Option<RemoteConfiguration>,
}

/// Fetches the remote configuration lazily, at most once until [`reset`](Self::reset).
///
/// A failed fetch is logged and remembered as "no configuration".
pub struct RemoteConfigProvider {
    url: Option<String>,
    http_client: reqwest::Client,
    cache: Mutex<CacheState>,
}

impl RemoteConfigProvider {
    /// Create a provider for the given configuration URL.
    pub fn new(url: Option<String>) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(CONFIG_CONNECT_TIMEOUT)
            .timeout(CONFIG_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url,
            http_client,
            cache: Mutex::new(CacheState::default()),
        })
    }

    /// Get the cached configuration, fetching it on first use.
    pub async fn get(&self) -> Option<RemoteConfiguration> {
        let url = self.url.as_deref()?;

        let mut cache = self.cache.lock().await;
        if !cache.initialized {
            cache.initialized = true;
            match self.fetch(url).await {
                Ok(config) => {
                    info!("Successfully fetched configuration");
                    cache.value = Some(config);
                }
                Err(e) => {
                    warn!(
                        "Unable to fetch configuration from URL in configuration-url param. {}",
                        e
                    );
                }
            }
        }

        cache.value.clone()
    }

    /// Forget the cached configuration so the next call fetches again.
    pub async fn reset(&self) {
        *self.cache.lock().await = CacheState::default();
    }

    async fn fetch(&self, url: &str) -> AppResult<RemoteConfiguration> {
        let config = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(config)
    }
}

#[async_trait]
impl ConfigurationProvider for RemoteConfigProvider {
    async fn webhook_url(&self) -> Option<String> {
        self.get()
            .await
            .and_then(|config| config.webhook_url)
            .filter(|url| !url.trim().is_empty())
    }
}
