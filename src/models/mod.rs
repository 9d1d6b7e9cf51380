//! Domain models for JUnit reports and their outbound payloads.

pub mod check_run;
pub mod counter;
pub mod github_context;
pub mod test_case;
pub mod test_suite;
pub mod webhook;

// Re-export commonly used types
pub use check_run::{CheckRun, Conclusion};
pub use counter::Counter;
pub use github_context::GitHubContext;
pub use test_case::{Disposition, Marker, NO_MESSAGE, TestCase};
pub use test_suite::{ParsedReport, TestSuite, TestSuites};
pub use webhook::{ResultKind, TestResultEntry, WebhookMessage};
