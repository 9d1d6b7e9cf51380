//! Depth-first traversal over nested test suites.

use tracing::warn;

use crate::models::{TestCase, TestSuite};

/// Visit every test case in the forest, in input order.
///
/// Each suite's own cases are visited before its child suites. Suites with
/// neither cases nor children are skipped with a warning.
pub fn for_each_test_case<'a, F>(suites: &'a [TestSuite], mut visit: F)
where
    F: FnMut(&'a TestCase),
{
    walk(suites, &mut visit);
}

fn walk<'a, F>(suites: &'a [TestSuite], visit: &mut F)
where
    F: FnMut(&'a TestCase),
{
    for suite in suites {
        if suite.is_malformed() {
            warn!(
                "Found empty testcase: {}",
                serde_json::to_string(suite).unwrap_or_default()
            );
            continue;
        }

        for case in suite.testcase.iter().flatten() {
            visit(case);
        }

        if let Some(children) = &suite.testsuite {
            walk(children, visit);
        }
    }
}

/// Collect every test case in the forest in traversal order.
pub fn collect_test_cases(suites: &[TestSuite]) -> Vec<&TestCase> {
    let mut cases = Vec::new();
    for_each_test_case(suites, |case| cases.push(case));
    cases
}
