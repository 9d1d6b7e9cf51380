//! E2E tests: chunked webhook delivery over HTTP.

use std::sync::Arc;

use junit_report_lib::error::AppError;
use junit_report_lib::services::{
    HttpTransport, NoRemoteConfig, WebhookSender, WebhookSettings,
};

use super::mock_receiver::MockReceiver;
use super::test_helpers::*;

fn sender(url: String, max_message_size: i64) -> WebhookSender<HttpTransport> {
    WebhookSender::new(
        HttpTransport::new().unwrap(),
        WebhookSettings {
            url: Some(url),
            max_message_size,
        },
        test_context(),
        Arc::new(NoRemoteConfig),
    )
}

#[actix_rt::test]
async fn test_fixture_results_fit_in_one_message() {
    let receiver = MockReceiver::start().await;
    let report = fixture_report().await;

    let parts = sender(receiver.url("/webhook"), 64 * 1024)
        .deliver(&report, &test_check_run())
        .await
        .unwrap();
    assert_eq!(parts, 1);

    let messages = receiver.messages();
    assert_eq!(messages.len(), 1);

    let body = &messages[0].body;
    assert_eq!(body["owner"], "foo");
    assert_eq!(body["repo"], "bar");
    assert_eq!(body["sha"], "fooSha");
    assert_eq!(body["ref"], "refs/heads/main");
    assert_eq!(body["runNumber"], 42);
    assert_eq!(body["runId"], 12345);
    assert_eq!(body["checkRun"]["id"], 4242);
    assert_eq!(body["part"], 0);
    assert_eq!(body["last"], true);

    let results = body["testResults"].as_array().unwrap();
    assert_eq!(results.len(), 9);
    // Depth-first: own cases before nested suites, files in sorted order
    let names: Vec<&str> = results.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        [
            "creates user",
            "rejects duplicate user",
            "deletes user",
            "opens session",
            "refreshes token",
            "refreshes expired token",
            "adds two numbers",
            "subtracts two numbers",
            "multiplies two numbers",
        ]
    );
    assert_eq!(results[1]["result"], "failed");
    assert_eq!(results[2]["result"], "skipped");
    assert_eq!(results[5]["result"], "failed");
    assert_eq!(results[6]["result"], "successful");
}

#[actix_rt::test]
async fn test_parts_arrive_in_order_within_budget() {
    let receiver = MockReceiver::start().await;
    let report = synthetic_report(120);
    let budget = 1024;

    let parts = sender(receiver.url("/webhook"), budget)
        .deliver(&report, &test_check_run())
        .await
        .unwrap();

    let messages = receiver.messages();
    assert!(parts > 1, "120 results should not fit into {} bytes", budget);
    assert_eq!(messages.len(), parts);

    let mut delivered = Vec::new();
    for (index, message) in messages.iter().enumerate() {
        assert!(
            message.size <= budget as usize,
            "Part {} is {} bytes",
            index,
            message.size
        );
        assert_eq!(message.body["part"], index);
        assert_eq!(message.body["last"], index == parts - 1);
        assert_eq!(message.body["created"], messages[0].body["created"]);

        let results = message.body["testResults"].as_array().unwrap();
        assert!(!results.is_empty());
        delivered.extend(results.iter().map(|r| r["name"].as_str().unwrap().to_string()));
    }

    let expected: Vec<String> = (0..120).map(|i| format!("case-{:03}", i)).collect();
    assert_eq!(delivered, expected);
}

#[actix_rt::test]
async fn test_disabled_budget_sends_nothing() {
    let receiver = MockReceiver::start().await;
    let report = fixture_report().await;

    let parts = sender(receiver.url("/webhook"), 0)
        .deliver(&report, &test_check_run())
        .await
        .unwrap();

    assert_eq!(parts, 0);
    assert!(receiver.messages().is_empty());
}

#[actix_rt::test]
async fn test_oversized_result_fails_delivery() {
    let receiver = MockReceiver::start().await;
    let report = fixture_report().await;

    let err = sender(receiver.url("/webhook"), 200)
        .deliver(&report, &test_check_run())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MessageTooLarge { limit: 200, .. }));
    assert!(receiver.messages().is_empty());
}

#[actix_rt::test]
async fn test_failed_send_aborts_remaining_parts() {
    let receiver = MockReceiver::start().await;
    let report = synthetic_report(120);

    let err = sender(receiver.url("/failing-webhook"), 1024)
        .deliver(&report, &test_check_run())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Http(_)));
    assert_eq!(receiver.failing_requests(), 1);
}
