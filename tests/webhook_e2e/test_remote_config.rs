//! E2E tests: webhook URL resolved through the remote configuration.

use std::sync::Arc;

use junit_report_lib::services::{
    ConfigurationProvider, HttpTransport, RemoteConfigProvider, WebhookSender, WebhookSettings,
};

use super::mock_receiver::MockReceiver;
use super::test_helpers::*;

#[actix_rt::test]
async fn test_configuration_is_fetched_once() {
    let receiver = MockReceiver::start().await;
    receiver.configure_webhook(&receiver.url("/webhook"));

    let provider = RemoteConfigProvider::new(Some(receiver.url("/config"))).unwrap();

    assert_eq!(provider.webhook_url().await, Some(receiver.url("/webhook")));
    assert_eq!(provider.webhook_url().await, Some(receiver.url("/webhook")));
    assert_eq!(receiver.config_requests(), 1);

    provider.reset().await;
    assert_eq!(provider.webhook_url().await, Some(receiver.url("/webhook")));
    assert_eq!(receiver.config_requests(), 2);
}

#[actix_rt::test]
async fn test_delivery_falls_back_to_remote_webhook() {
    let receiver = MockReceiver::start().await;
    receiver.configure_webhook(&receiver.url("/webhook"));
    let report = fixture_report().await;

    let provider = Arc::new(RemoteConfigProvider::new(Some(receiver.url("/config"))).unwrap());
    let sender = WebhookSender::new(
        HttpTransport::new().unwrap(),
        WebhookSettings {
            url: None,
            max_message_size: 64 * 1024,
        },
        test_context(),
        provider,
    );

    let parts = sender.deliver(&report, &test_check_run()).await.unwrap();

    assert_eq!(parts, 1);
    assert_eq!(receiver.messages().len(), 1);
    assert_eq!(receiver.config_requests(), 1);
}

#[actix_rt::test]
async fn test_input_url_wins_over_remote_configuration() {
    let receiver = MockReceiver::start().await;
    receiver.configure_webhook(&receiver.url("/failing-webhook"));
    let report = fixture_report().await;

    let provider = Arc::new(RemoteConfigProvider::new(Some(receiver.url("/config"))).unwrap());
    let sender = WebhookSender::new(
        HttpTransport::new().unwrap(),
        WebhookSettings {
            url: Some(receiver.url("/webhook")),
            max_message_size: 64 * 1024,
        },
        test_context(),
        provider,
    );

    sender.deliver(&report, &test_check_run()).await.unwrap();

    assert_eq!(receiver.messages().len(), 1);
    assert_eq!(receiver.config_requests(), 0);
    assert_eq!(receiver.failing_requests(), 0);
}

#[actix_rt::test]
async fn test_missing_webhook_in_configuration_skips_delivery() {
    let receiver = MockReceiver::start().await;
    let report = fixture_report().await;

    let provider = Arc::new(RemoteConfigProvider::new(Some(receiver.url("/config"))).unwrap());
    let sender = WebhookSender::new(
        HttpTransport::new().unwrap(),
        WebhookSettings {
            url: None,
            max_message_size: 64 * 1024,
        },
        test_context(),
        provider,
    );

    let parts = sender.deliver(&report, &test_check_run()).await.unwrap();

    assert_eq!(parts, 0);
    assert!(receiver.messages().is_empty());
    assert_eq!(receiver.config_requests(), 1);
}
