//! Markdown summary rendering for check runs.

use std::collections::BTreeMap;

use crate::models::{Disposition, TestCase};
use crate::services::filter::TestFilter;
use crate::services::report::TestReport;
use crate::services::suites::for_each_test_case;

/// Rendered when the report holds no tests.
pub const NO_RESULTS_MESSAGE: &str = "### Test results not found\n";

/// Maximum number of detail entries listed per category.
pub const MAX_DETAILS_PER_CATEGORY: usize = 10;

const PASSED_GLYPH: &str = "✅";
const FAILED_GLYPH: &str = "❌";
const SKIPPED_GLYPH: &str = "⏭️";

const TABLE_HEADER: &str = "| Test case | Result | Duration |\n| :--- | :---: | ---: |\n";

const TRUNCATION_NOTICE: &str = "_Only the first ten tests are listed below!_";

/// Category keys in the order summary lines are emitted.
const OUTCOME_KEYS: [&str; 3] = ["failures", "errors", "skipped"];

fn plural(key: &str, count: i64) -> &'static str {
    let one = count == 1;
    match key {
        "skipped" => {
            if one { "test is" } else { "tests are" }
        }
        "successful" => {
            if one { "test was" } else { "tests were" }
        }
        _ => {
            if one { "test" } else { "tests" }
        }
    }
}

fn outcome_verb(key: &str) -> &'static str {
    match key {
        "failures" => "failed",
        "errors" => "ended with error",
        "skipped" => "skipped",
        _ => "",
    }
}

fn category_title(key: &str) -> &'static str {
    match key {
        "skipped" => "Skipped tests",
        "failures" => "Failed tests",
        "errors" => "Errors",
        _ => "Other",
    }
}

fn result_glyph(disposition: Disposition) -> &'static str {
    match disposition {
        Disposition::Error | Disposition::Failure => FAILED_GLYPH,
        Disposition::Skipped => SKIPPED_GLYPH,
        Disposition::Successful => PASSED_GLYPH,
    }
}

/// Escape text placed inside a markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn or_unknown(text: &str) -> &str {
    if text.is_empty() { "unknown" } else { text }
}

/// Bold label shown in a detail block's summary.
fn case_label(case: &TestCase) -> String {
    let name = or_unknown(case.trimmed_name());
    let classname = or_unknown(case.trimmed_classname());

    if name.to_lowercase() == classname.to_lowercase() {
        format!("<strong>{}</strong>", name)
    } else {
        format!("<strong>{}</strong>: {}", classname, name)
    }
}

fn quote(message: &str) -> String {
    message
        .lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn details_block(case: &TestCase) -> String {
    format!(
        "<details>\n <summary>{}</summary>\n\n{}\n\n</details>",
        case_label(case),
        quote(case.message().unwrap_or_default())
    )
}

/// Detail entries of one category, capped at [`MAX_DETAILS_PER_CATEGORY`].
#[derive(Debug, Default)]
struct Category {
    entries: Vec<String>,
    total: usize,
}

/// Non-successful cases grouped by category key, iterated alphabetically.
#[derive(Debug, Default)]
struct DetailBuckets {
    categories: BTreeMap<&'static str, Category>,
}

impl DetailBuckets {
    fn push(&mut self, case: &TestCase) {
        let Some(key) = case.disposition().bucket_key() else {
            return;
        };

        let category = self.categories.entry(key).or_default();
        category.total += 1;
        if category.entries.len() < MAX_DETAILS_PER_CATEGORY {
            category.entries.push(details_block(case));
        }
    }

    fn render_into(&self, out: &mut String) {
        for (key, category) in &self.categories {
            if category.entries.is_empty() {
                continue;
            }

            out.push_str(&format!("\n### {}\n\n", category_title(key)));
            if category.total > category.entries.len() {
                out.push_str(TRUNCATION_NOTICE);
                out.push_str("\n\n");
            }
            out.push_str(&category.entries.join("\n\n"));
            out.push('\n');
        }
    }
}

fn summary_lines(report: &dyn TestReport) -> String {
    let counter = report.counter();
    let (tests, successful) = (counter.tests, counter.successful);

    let mut lines = vec![if successful == tests {
        "- All tests were successful".to_string()
    } else if successful > 0 {
        format!("- {} {} successful", successful, plural("successful", successful))
    } else {
        "- No tests were successful".to_string()
    }];

    for key in OUTCOME_KEYS {
        let count = counter.get(key);
        if count != 0 {
            lines.push(format!("- {} {} {}", count, plural(key, count), outcome_verb(key)));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the report as markdown.
///
/// Suites failing the suite predicate are left out entirely; within kept
/// suites, only cases passing the case predicate appear in the table and in
/// the detail sections.
pub fn render(report: &dyn TestReport, filter: TestFilter) -> String {
    if !report.has_tests() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let counter = report.counter();
    let glyph = if counter.successful == counter.tests {
        PASSED_GLYPH
    } else {
        FAILED_GLYPH
    };

    let mut out = format!(
        "### {} Found {} {}\n",
        glyph,
        counter.tests,
        plural("tests", counter.tests)
    );
    let mut details = DetailBuckets::default();

    for suite in report.test_suites() {
        if !filter.should_report_suite(suite) {
            continue;
        }

        let mut rows = String::new();
        for_each_test_case(std::slice::from_ref(suite), |case| {
            if !filter.should_report_case(case) {
                return;
            }

            let name = case.trimmed_name();
            rows.push_str(&format!(
                "| {} | {} | {} ms |\n",
                table_cell(if name.is_empty() { "Unnamed test case" } else { name }),
                result_glyph(case.disposition()),
                case.duration_ms().round() as i64
            ));
            details.push(case);
        });

        if suite.is_malformed() {
            continue;
        }

        out.push_str(&format!("\n#### {}\n\n", table_cell(suite.display_name())));
        out.push_str(TABLE_HEADER);
        out.push_str(&rows);
    }

    out.push('\n');
    out.push_str(&summary_lines(report));
    details.render_into(&mut out);

    out
}
