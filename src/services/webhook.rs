//! Webhook delivery of per-test results, split into size-bounded parts.
//!
//! Parts are sent strictly in order and each send is awaited before the
//! next one starts: receivers rely on `part` ordering and on exactly one
//! part being flagged `last`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{CheckRun, GitHubContext, TestResultEntry, WebhookMessage};
use crate::services::remote_config::ConfigurationProvider;
use crate::services::report::TestReport;
use crate::services::suites::collect_test_cases;

/// HTTP connect timeout for webhook posts.
const WEBHOOK_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP total timeout for webhook posts.
const WEBHOOK_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound channel for webhook messages.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// Deliver one message. Errors abort the remaining delivery.
    async fn post(&self, url: &str, message: &WebhookMessage) -> AppResult<()>;
}

/// JSON-over-HTTP transport.
#[derive(Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(WEBHOOK_CONNECT_TIMEOUT)
            .timeout(WEBHOOK_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn post(&self, url: &str, message: &WebhookMessage) -> AppResult<()> {
        self.http_client
            .post(url)
            .json(message)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Webhook inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookSettings {
    /// Destination URL given as input; the configuration provider is asked otherwise.
    pub url: Option<String>,
    /// Byte budget per message; non-positive disables delivery.
    pub max_message_size: i64,
}

/// Serialized size of the envelope for a given part index.
fn envelope_size(envelope: &WebhookMessage, part: usize) -> AppResult<usize> {
    let sized = WebhookMessage {
        part,
        ..envelope.clone()
    };
    Ok(serde_json::to_vec(&sized)?.len())
}

/// Sends test results to a webhook in size-bounded parts.
pub struct WebhookSender<T> {
    transport: T,
    settings: WebhookSettings,
    context: GitHubContext,
    config: Arc<dyn ConfigurationProvider>,
}

impl<T: WebhookTransport> WebhookSender<T> {
    pub fn new(
        transport: T,
        settings: WebhookSettings,
        context: GitHubContext,
        config: Arc<dyn ConfigurationProvider>,
    ) -> Self {
        Self {
            transport,
            settings,
            context,
            config,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn resolve_url(&self) -> Option<String> {
        match self.settings.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(url.to_string()),
            _ => self.config.webhook_url().await,
        }
    }

    /// Deliver every test case of the report. Returns the number of parts sent.
    ///
    /// Delivery is skipped (returning 0) without a URL or with a non-positive
    /// budget. A single result that cannot fit into an empty message fails
    /// the delivery; parts already sent are not retracted.
    pub async fn deliver(&self, report: &dyn TestReport, check_run: &CheckRun) -> AppResult<usize> {
        let limit = usize::try_from(self.settings.max_message_size).unwrap_or(0);
        let url = match self.resolve_url().await {
            Some(url) if limit > 0 => url,
            _ => {
                info!("Skipping sending test results to webhook endpoint.");
                return Ok(0);
            }
        };

        let entries: Vec<TestResultEntry> = collect_test_cases(report.test_suites())
            .into_iter()
            .map(TestResultEntry::from)
            .collect();

        let envelope =
            WebhookMessage::envelope(&self.context, check_run, Utc::now().timestamp_millis());

        let mut part = 0;
        let mut chunk: Vec<TestResultEntry> = Vec::new();
        let mut chunk_size = envelope_size(&envelope, part)?;

        for entry in entries {
            let size = serde_json::to_vec(&entry)?.len() + 1;

            if chunk_size + size > limit && !chunk.is_empty() {
                info!("Sending test results to webhook endpoint - part [{}].", part);
                self.send(&url, &envelope, part, false, std::mem::take(&mut chunk))
                    .await?;

                part += 1;
                chunk_size = envelope_size(&envelope, part)?;
            }

            if chunk_size + size > limit {
                return Err(AppError::MessageTooLarge {
                    size,
                    overhead: chunk_size,
                    limit,
                    name: entry.name,
                });
            }

            chunk.push(entry);
            chunk_size += size;
        }

        if chunk.is_empty() {
            debug!("No test results to send to webhook endpoint");
            return Ok(part);
        }

        info!("Sending test results to webhook endpoint.");
        self.send(&url, &envelope, part, true, chunk).await?;

        Ok(part + 1)
    }

    async fn send(
        &self,
        url: &str,
        envelope: &WebhookMessage,
        part: usize,
        last: bool,
        test_results: Vec<TestResultEntry>,
    ) -> AppResult<()> {
        let message = WebhookMessage {
            part,
            last,
            test_results,
            ..envelope.clone()
        };
        self.transport.post(url, &message).await
    }
}
