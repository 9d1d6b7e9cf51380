//! E2E tests: check-run creation from report files.

use junit_report_lib::models::Conclusion;
use junit_report_lib::services::{CheckClient, Report, TestFilter, TestReport};

use super::mock_receiver::{CHECK_RUN_ID, CHECK_SUITE_ID, MockReceiver};
use super::test_helpers::*;

#[actix_rt::test]
async fn test_fixture_report_counts() {
    let report = fixture_report().await;

    assert_eq!(report.test_suites().len(), 3);
    let counter = report.counter();
    assert_eq!(counter.tests, 9);
    assert_eq!(counter.failures, 1);
    assert_eq!(counter.errors, 1);
    assert_eq!(counter.skipped, 1);
    assert_eq!(counter.successful, 6);
}

#[actix_rt::test]
async fn test_check_run_created_for_failing_report() {
    let receiver = MockReceiver::start().await;
    let report = fixture_report().await;

    let client = CheckClient::new(
        &github_settings(&receiver.base_url, Some(r#"{"node": 20, "os": "ubuntu-latest"}"#)),
        test_context(),
    )
    .unwrap();
    let check_run = client.create(&report, TestFilter::All).await.unwrap();

    assert_eq!(check_run.id, CHECK_RUN_ID);
    assert_eq!(check_run.node_id, "CR_kwDOAbCdEf8AAAAB");
    assert_eq!(check_run.check_suite_id, Some(CHECK_SUITE_ID));
    assert_eq!(check_run.conclusion, Conclusion::Failure);

    let requests = receiver.check_runs();
    assert_eq!(requests.len(), 1, "Exactly one check run should be created");

    let request = &requests[0];
    assert_eq!(request.path, "/repos/foo/bar/check-runs");
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {}", TEST_TOKEN).as_str())
    );

    let body = &request.body;
    assert_eq!(body["name"], "JUnit Report: build (ubuntu-latest, node: 20)");
    assert_eq!(body["head_sha"], "fooSha");
    assert_eq!(body["status"], "completed");
    assert_eq!(body["conclusion"], "failure");
    assert_eq!(body["output"]["title"], body["name"]);

    let summary = body["output"]["summary"].as_str().unwrap();
    assert!(summary.starts_with("### ❌ Found 9 tests\n"));
    assert!(summary.contains("#### api.UserTest"));
    assert!(summary.contains("#### com.example.CalculatorTest"));
    assert!(summary.contains("| refreshes expired token | ❌ | 300 ms |"));
    assert!(summary.contains("- 6 tests were successful\n- 1 test failed\n- 1 test ended with error\n- 1 test is skipped\n"));
    assert!(summary.contains("> expected status 409 but was 200"));
    assert!(summary.contains("> connection refused"));
}

#[actix_rt::test]
async fn test_failures_filter_limits_summary() {
    let receiver = MockReceiver::start().await;
    let report = fixture_report().await;

    let client =
        CheckClient::new(&github_settings(&receiver.base_url, None), test_context()).unwrap();
    client.create(&report, TestFilter::FailuresOnly).await.unwrap();

    let requests = receiver.check_runs();
    let summary = requests[0].body["output"]["summary"].as_str().unwrap();

    assert_eq!(requests[0].body["name"], "JUnit Report: build");
    assert!(!summary.contains("#### com.example.CalculatorTest"));
    assert!(!summary.contains("| creates user |"));
    assert!(summary.contains("| rejects duplicate user | ❌ |"));
    assert!(!summary.contains("### Skipped tests"));
    // Counters still describe the whole report
    assert!(summary.contains("- 1 test is skipped"));
}

#[actix_rt::test]
async fn test_check_run_for_empty_report() {
    let receiver = MockReceiver::start().await;

    let mut report = Report::new("nothing-matches-*.xml").in_dir(fixtures_dir());
    report.build().await.unwrap();

    let client =
        CheckClient::new(&github_settings(&receiver.base_url, None), test_context()).unwrap();
    let check_run = client.create(&report, TestFilter::All).await.unwrap();

    assert_eq!(check_run.conclusion, Conclusion::Failure);
    let requests = receiver.check_runs();
    assert_eq!(
        requests[0].body["output"]["summary"],
        "### Test results not found\n"
    );
}

#[actix_rt::test]
async fn test_pull_request_head_sha_is_preferred() {
    let receiver = MockReceiver::start().await;
    let report = fixture_report().await;

    let mut context = test_context();
    context.pull_request_head_sha = Some("prHeadSha".to_string());

    let client = CheckClient::new(&github_settings(&receiver.base_url, None), context).unwrap();
    client.create(&report, TestFilter::All).await.unwrap();

    assert_eq!(receiver.check_runs()[0].body["head_sha"], "prHeadSha");
}
