//! JUnit report action - Main entry point.
//!
//! Collects JUnit reports, publishes a check run and forwards results to a webhook.

use std::sync::Arc;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use junit_report_lib::config::Config;
use junit_report_lib::error::AppResult;
use junit_report_lib::services::{
    CheckClient, ConfigurationProvider, HttpTransport, NoRemoteConfig, RemoteConfigProvider,
    Report, TestReport, WebhookSender,
};

async fn run(config: Config) -> AppResult<()> {
    let mut report = Report::new(&config.reports_path);
    report.build().await?;

    let counter = report.counter();
    info!(
        "Found {} tests: {} successful, {} failed, {} with errors, {} skipped",
        counter.tests, counter.successful, counter.failures, counter.errors, counter.skipped
    );

    let check = CheckClient::new(&config.github, config.context.clone())?;
    let check_run = check.create(&report, config.filter).await?;

    let provider: Arc<dyn ConfigurationProvider> = match config.configuration_url {
        Some(url) => Arc::new(RemoteConfigProvider::new(Some(url))?),
        None => Arc::new(NoRemoteConfig),
    };

    let sender = WebhookSender::new(HttpTransport::new()?, config.webhook, config.context, provider);
    let parts = sender.deliver(&report, &check_run).await?;
    if parts > 0 {
        info!("Sent test results to webhook endpoint in {} part(s)", parts);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your action inputs:");
            error!("  - INPUT_TOKEN and INPUT_PATH must be set");
            std::process::exit(1);
        }
    };

    info!(
        "Reading reports from {} (filter: {})",
        config.reports_path, config.filter
    );

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
