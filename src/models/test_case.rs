//! Test case model and outcome classification.

use serde::{Deserialize, Serialize};

/// Placeholder used when a non-successful case carries no message.
pub const NO_MESSAGE: &str = "No message provided";

/// One `<skipped>`, `<error>` or `<failure>` entry attached to a test case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Marker {
    pub fn new(message: impl Into<String>) -> Self {
        Marker {
            message: Some(message.into()),
        }
    }
}

/// Derived classification of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Disposition {
    Successful,
    Skipped,
    Error,
    Failure,
}

impl Disposition {
    /// Key of the detail bucket a case with this disposition is grouped into.
    ///
    /// Successful cases are never grouped.
    pub fn bucket_key(&self) -> Option<&'static str> {
        match self {
            Self::Successful => None,
            Self::Skipped => Some("skipped"),
            Self::Error => Some("errors"),
            Self::Failure => Some("failures"),
        }
    }

    /// Whether the case counts as failed (error or failure).
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Error | Self::Failure)
    }
}

/// Individual test execution record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classname: Option<String>,
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<Marker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error: Vec<Marker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure: Vec<Marker>,
}

impl TestCase {
    /// Create a successful test case.
    pub fn new(classname: impl Into<String>, name: impl Into<String>) -> Self {
        TestCase {
            name: Some(name.into()),
            classname: Some(classname.into()),
            ..Default::default()
        }
    }

    /// Classify the case. `skipped` wins over `error`, which wins over `failure`.
    pub fn disposition(&self) -> Disposition {
        if !self.skipped.is_empty() {
            Disposition::Skipped
        } else if !self.error.is_empty() {
            Disposition::Error
        } else if !self.failure.is_empty() {
            Disposition::Failure
        } else {
            Disposition::Successful
        }
    }

    fn markers(&self) -> &[Marker] {
        match self.disposition() {
            Disposition::Skipped => &self.skipped,
            Disposition::Error => &self.error,
            Disposition::Failure => &self.failure,
            Disposition::Successful => &[],
        }
    }

    /// Trimmed message of the first marker, or [`NO_MESSAGE`].
    ///
    /// Returns `None` for successful cases.
    pub fn message(&self) -> Option<&str> {
        let marker = self.markers().first()?;
        let message = marker
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(NO_MESSAGE);
        Some(message)
    }

    /// Duration in milliseconds, 0 when absent.
    pub fn duration_ms(&self) -> f64 {
        self.time.unwrap_or(0.0) * 1000.0
    }

    /// Trimmed case name, empty when absent.
    pub fn trimmed_name(&self) -> &str {
        self.name.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Trimmed class name, empty when absent.
    pub fn trimmed_classname(&self) -> &str {
        self.classname.as_deref().map(str::trim).unwrap_or_default()
    }
}
