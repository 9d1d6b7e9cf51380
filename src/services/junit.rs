//! JUnit XML parsing into the suite model.
//!
//! Accepts either a `<testsuites>` wrapper or a bare `<testsuite>` root.
//! Numeric attributes are parsed leniently: anything unparsable is treated
//! as absent.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{Marker, ParsedReport, TestCase, TestSuite, TestSuites};

// ============================================================================
// JUnit XML Schema Structs
// ============================================================================

#[derive(Debug, Deserialize)]
struct XmlTestSuites {
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(default)]
    testsuite: Vec<XmlTestSuite>,
}

#[derive(Debug, Deserialize)]
struct XmlTestSuite {
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(rename = "@tests", default)]
    tests: Option<String>,
    #[serde(rename = "@failures", default)]
    failures: Option<String>,
    #[serde(rename = "@errors", default)]
    errors: Option<String>,
    #[serde(rename = "@skipped", default)]
    skipped: Option<String>,
    #[serde(rename = "@time", default)]
    time: Option<String>,
    #[serde(default)]
    testcase: Vec<XmlTestCase>,
    #[serde(default)]
    testsuite: Vec<XmlTestSuite>,
}

#[derive(Debug, Deserialize)]
struct XmlTestCase {
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(rename = "@classname", default)]
    classname: Option<String>,
    #[serde(rename = "@time", default)]
    time: Option<String>,
    #[serde(default)]
    skipped: Vec<XmlMarker>,
    #[serde(default)]
    error: Vec<XmlMarker>,
    #[serde(default)]
    failure: Vec<XmlMarker>,
}

#[derive(Debug, Deserialize)]
struct XmlMarker {
    #[serde(rename = "@message", default)]
    message: Option<String>,
}

// ============================================================================
// Conversion
// ============================================================================

fn lenient_count(value: Option<String>) -> Option<i64> {
    value?.trim().parse().ok()
}

fn lenient_seconds(value: Option<String>) -> Option<f64> {
    value?
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
}

/// Empty element lists become absent, matching how the suite model marks
/// a missing `testcase`/`testsuite` array.
fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

impl From<XmlMarker> for Marker {
    fn from(marker: XmlMarker) -> Self {
        Marker {
            message: marker.message,
        }
    }
}

impl From<XmlTestCase> for TestCase {
    fn from(case: XmlTestCase) -> Self {
        TestCase {
            name: case.name,
            classname: case.classname,
            time: lenient_seconds(case.time),
            skipped: case.skipped.into_iter().map(Marker::from).collect(),
            error: case.error.into_iter().map(Marker::from).collect(),
            failure: case.failure.into_iter().map(Marker::from).collect(),
        }
    }
}

impl From<XmlTestSuite> for TestSuite {
    fn from(suite: XmlTestSuite) -> Self {
        TestSuite {
            name: suite.name,
            tests: lenient_count(suite.tests),
            failures: lenient_count(suite.failures),
            errors: lenient_count(suite.errors),
            skipped: lenient_count(suite.skipped),
            time: lenient_seconds(suite.time),
            testcase: non_empty(suite.testcase.into_iter().map(TestCase::from).collect()),
            testsuite: non_empty(suite.testsuite.into_iter().map(TestSuite::from).collect()),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Local name of the document's root element.
fn root_element(xml: &str) -> AppResult<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => return Ok(e.local_name().as_ref().to_vec()),
            Event::Eof => {
                return Err(AppError::Parse(
                    "Document does not contain a root element".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Parse one JUnit report document.
pub fn parse(xml: &str) -> AppResult<ParsedReport> {
    match root_element(xml)?.as_slice() {
        b"testsuites" => {
            let wrapper: XmlTestSuites = quick_xml::de::from_str(xml)?;
            Ok(ParsedReport::Suites(TestSuites {
                name: wrapper.name,
                testsuite: wrapper.testsuite.into_iter().map(TestSuite::from).collect(),
            }))
        }
        b"testsuite" => {
            let suite: XmlTestSuite = quick_xml::de::from_str(xml)?;
            Ok(ParsedReport::Suite(suite.into()))
        }
        other => Err(AppError::Parse(format!(
            "Unexpected root element <{}>, expected <testsuites> or <testsuite>",
            String::from_utf8_lossy(other)
        ))),
    }
}
