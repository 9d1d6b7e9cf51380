//! Test suite model representing one (possibly nested) `<testsuite>` element.

use serde::{Deserialize, Serialize};

use super::TestCase;

/// Test suite with its producer-declared counters.
///
/// A suite may hold test cases, child suites, or both. A suite holding
/// neither is malformed and is skipped during traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<i64>,
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testcase: Option<Vec<TestCase>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testsuite: Option<Vec<TestSuite>>,
}

impl TestSuite {
    /// Create a suite holding the given cases.
    pub fn new(name: impl Into<String>, cases: Vec<TestCase>) -> Self {
        TestSuite {
            name: Some(name.into()),
            testcase: Some(cases),
            ..Default::default()
        }
    }

    /// Whether the suite lacks both a case list and a child suite list.
    pub fn is_malformed(&self) -> bool {
        self.testcase.is_none() && self.testsuite.is_none()
    }

    /// Display name, with a placeholder when absent.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Unnamed suite")
    }
}

/// `<testsuites>` wrapper holding top-level suites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSuites {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub testsuite: Vec<TestSuite>,
}

/// Result of parsing one report file.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReport {
    Suite(TestSuite),
    Suites(TestSuites),
}

impl ParsedReport {
    /// Flatten into top-level suites.
    ///
    /// Children of a wrapper named `"undefined"` take the wrapper's name.
    pub fn into_suites(self) -> Vec<TestSuite> {
        match self {
            Self::Suite(suite) => vec![suite],
            Self::Suites(wrapper) => {
                let TestSuites { name, testsuite } = wrapper;
                testsuite
                    .into_iter()
                    .map(|mut suite| {
                        if suite.name.as_deref() == Some("undefined") && name.is_some() {
                            suite.name = name.clone();
                        }
                        suite
                    })
                    .collect()
            }
        }
    }
}
