//! Aggregate counters over top-level test suites.

use super::TestSuite;

/// Totals reduced from the producer-declared counts of top-level suites.
///
/// Nested suites are not summed; producers are expected to roll their
/// counts up into the top-level suite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    pub tests: i64,
    pub skipped: i64,
    pub failures: i64,
    pub errors: i64,
    /// `tests - failures - errors - skipped`, not clamped at zero.
    pub successful: i64,
}

impl Counter {
    /// Reset and accumulate the given suites, then derive `successful`.
    pub fn setup(&mut self, suites: &[TestSuite]) {
        *self = Counter::default();

        for suite in suites {
            self.update(suite);
        }

        self.derive_successful();
    }

    /// Add one suite's declared counts. Does not touch `successful`.
    pub fn update(&mut self, suite: &TestSuite) {
        self.tests += suite.tests.unwrap_or(0);
        self.skipped += suite.skipped.unwrap_or(0);
        self.failures += suite.failures.unwrap_or(0);
        self.errors += suite.errors.unwrap_or(0);
    }

    /// Recompute `successful` from the other totals.
    pub fn derive_successful(&mut self) {
        self.successful = self.tests - self.failures - self.errors - self.skipped;
    }

    /// Look a total up by name; unknown keys yield 0.
    pub fn get(&self, key: &str) -> i64 {
        match key {
            "tests" => self.tests,
            "skipped" => self.skipped,
            "failures" => self.failures,
            "errors" => self.errors,
            _ => 0,
        }
    }
}
