//! Delivery E2E test suite.
//!
//! Runs report ingestion, check-run creation and webhook delivery against an
//! in-process HTTP receiver.
//!
//! Run with: cargo test --test webhook_e2e

mod mock_receiver;

mod test_check_run;
mod test_remote_config;
mod test_webhook_delivery;
