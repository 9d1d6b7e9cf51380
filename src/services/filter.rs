//! Result filters selecting which suites and cases are surfaced.

use crate::models::{TestCase, TestSuite};

/// Suite-level and case-level predicates.
///
/// The two predicates are independent: consumers decide how to combine them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TestFilter {
    /// Report everything
    #[default]
    All,
    /// Report failed and errored results only
    FailuresOnly,
    /// Report failed, errored and skipped results
    FailuresAndSkipped,
}

fn non_zero(count: Option<i64>) -> bool {
    count.is_some_and(|c| c != 0)
}

impl TestFilter {
    /// Parse a filter selector. Unknown or missing values select [`TestFilter::All`].
    pub fn parse(selector: Option<&str>) -> Self {
        match selector.map(str::trim) {
            Some("failures") => Self::FailuresOnly,
            Some("failures-and-skipped") => Self::FailuresAndSkipped,
            _ => Self::All,
        }
    }

    /// Whether a test case should be reported.
    pub fn should_report_case(&self, case: &TestCase) -> bool {
        let failed = !case.failure.is_empty() || !case.error.is_empty();
        match self {
            Self::All => true,
            Self::FailuresOnly => failed,
            Self::FailuresAndSkipped => failed || !case.skipped.is_empty(),
        }
    }

    /// Whether a suite should be reported, judged by its own declared counts.
    pub fn should_report_suite(&self, suite: &TestSuite) -> bool {
        let failed = non_zero(suite.failures) || non_zero(suite.errors);
        match self {
            Self::All => true,
            Self::FailuresOnly => failed,
            Self::FailuresAndSkipped => failed || non_zero(suite.skipped),
        }
    }
}

impl std::fmt::Display for TestFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::FailuresOnly => write!(f, "failures"),
            Self::FailuresAndSkipped => write!(f, "failures-and-skipped"),
        }
    }
}
