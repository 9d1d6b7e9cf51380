//! Report aggregate: discovered suites plus their counters.

use std::path::{Path, PathBuf};

use globwalk::{FileType, GlobWalkerBuilder};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Counter, TestSuite};
use crate::services::junit;

/// Read-only view of a built report.
///
/// The formatter, the webhook sender and the check client only depend on
/// this capability, so tests can hand them plain data.
pub trait TestReport {
    /// Top-level suites in discovery order.
    fn test_suites(&self) -> &[TestSuite];

    /// Totals over the top-level suites.
    fn counter(&self) -> &Counter;

    fn has_tests(&self) -> bool {
        self.counter().tests > 0
    }

    fn has_failures(&self) -> bool {
        self.counter().failures > 0
    }

    fn has_errors(&self) -> bool {
        self.counter().errors > 0
    }

    fn has_skipped(&self) -> bool {
        self.counter().skipped > 0
    }

    fn is_successful(&self) -> bool {
        let counter = self.counter();
        counter.tests == counter.successful
    }
}

/// JUnit report collected from all files matching a glob pattern.
#[derive(Debug, Clone)]
pub struct Report {
    pattern: String,
    base_dir: PathBuf,
    suites: Vec<TestSuite>,
    counter: Counter,
    built: bool,
}

impl Report {
    /// Create an unbuilt report for glob patterns relative to the working directory.
    ///
    /// `pattern` holds one pattern per line. Lines starting with `!` exclude
    /// matches, lines starting with `#` are comments.
    pub fn new(pattern: impl Into<String>) -> Self {
        Report {
            pattern: pattern.into(),
            base_dir: PathBuf::from("."),
            suites: Vec::new(),
            counter: Counter::default(),
            built: false,
        }
    }

    /// Resolve relative patterns against `dir` instead of the working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Create an already built report from parsed suites.
    pub fn from_suites(suites: Vec<TestSuite>) -> Self {
        let mut counter = Counter::default();
        counter.setup(&suites);
        Report {
            pattern: String::new(),
            base_dir: PathBuf::from("."),
            suites,
            counter,
            built: true,
        }
    }

    /// Discover, read and parse all matching report files, then count them.
    ///
    /// Can only run once per report.
    pub async fn build(&mut self) -> AppResult<()> {
        if self.built {
            return Err(AppError::AlreadyBuilt);
        }
        self.built = true;

        debug!("Will search {} for JUnit test reports", self.pattern);

        let files = discover_files(self.base_dir.clone(), self.pattern.clone()).await?;
        if files.is_empty() {
            warn!("No JUnit test reports found for pattern {}", self.pattern);
        }

        for file in &files {
            debug!("Parsing JUnit report {}", file.display());

            let content = tokio::fs::read_to_string(file).await.map_err(|e| {
                AppError::Io(format!("Failed to read {}: {}", file.display(), e))
            })?;

            let parsed = junit::parse(&content)
                .map_err(|e| AppError::Parse(format!("{}: {}", file.display(), e)))?;

            self.suites.extend(parsed.into_suites());
        }

        self.counter.setup(&self.suites);

        info!(
            "Collected {} test suites from {} files ({} tests, {} failures, {} errors, {} skipped)",
            self.suites.len(),
            files.len(),
            self.counter.tests,
            self.counter.failures,
            self.counter.errors,
            self.counter.skipped
        );

        Ok(())
    }
}

impl TestReport for Report {
    fn test_suites(&self) -> &[TestSuite] {
        &self.suites
    }

    fn counter(&self) -> &Counter {
        &self.counter
    }
}

/// Characters that end the literal directory prefix of a pattern.
const GLOB_CHARS: [char; 4] = ['*', '?', '[', '{'];

/// Split one input line into its exclusion flag and pattern.
///
/// Blank lines and comments yield `None`. Leading `./` is dropped.
fn normalize_line(line: &str) -> Option<(bool, &str)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }

    let (negated, mut pattern) = match line.strip_prefix('!') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, line),
    };
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }

    if pattern.is_empty() {
        None
    } else {
        Some((negated, pattern))
    }
}

/// Whether the input holds at least one pattern that is not an exclusion.
pub fn has_include_pattern(input: &str) -> bool {
    input
        .lines()
        .filter_map(normalize_line)
        .any(|(negated, _)| !negated)
}

/// A normalized pattern line: a directory to walk and an anchored glob below it.
#[derive(Debug, Clone, PartialEq)]
struct PatternLine {
    negated: bool,
    root: PathBuf,
    glob: String,
}

impl PatternLine {
    fn parse(base_dir: &Path, line: &str) -> Option<Self> {
        let (negated, pattern) = normalize_line(line)?;

        let path = Path::new(pattern);
        if !path.is_absolute() {
            return Some(PatternLine {
                negated,
                root: base_dir.to_path_buf(),
                glob: format!("/{}", pattern),
            });
        }

        let mut root = PathBuf::new();
        let mut rest = Vec::new();
        for component in path.components() {
            let text = component.as_os_str().to_string_lossy();
            if rest.is_empty() && !text.contains(GLOB_CHARS) {
                root.push(component);
            } else {
                rest.push(text.into_owned());
            }
        }

        // Plain file path: walk its directory
        if rest.is_empty() {
            rest.push(root.file_name()?.to_string_lossy().into_owned());
            root.pop();
        }

        Some(PatternLine {
            negated,
            root,
            glob: format!("/{}", rest.join("/")),
        })
    }

    fn full_path(&self) -> PathBuf {
        self.root.join(self.glob.trim_start_matches('/'))
    }
}

/// Group the input into one walk per root directory.
///
/// Exclusions apply to every walk they fall under, wherever they appear in
/// the input.
fn walk_plan(base_dir: &Path, input: &str) -> Vec<(PathBuf, Vec<String>)> {
    let lines: Vec<PatternLine> = input
        .lines()
        .filter_map(|line| PatternLine::parse(base_dir, line))
        .collect();

    let mut plan: Vec<(PathBuf, Vec<String>)> = Vec::new();
    for line in lines.iter().filter(|l| !l.negated) {
        match plan.iter_mut().find(|(root, _)| *root == line.root) {
            Some((_, globs)) => globs.push(line.glob.clone()),
            None => plan.push((line.root.clone(), vec![line.glob.clone()])),
        }
    }

    for line in lines.iter().filter(|l| l.negated) {
        let excluded = line.full_path();
        for (root, globs) in plan.iter_mut() {
            match excluded.strip_prefix(root.as_path()) {
                Ok(relative) if !relative.as_os_str().is_empty() => {
                    globs.push(format!("!/{}", relative.to_string_lossy()));
                }
                _ => {}
            }
        }
    }

    plan
}

/// Find report files without following symlinks, sorted for a stable order.
async fn discover_files(base_dir: PathBuf, pattern: String) -> AppResult<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || -> AppResult<Vec<PathBuf>> {
        let plan = walk_plan(&base_dir, &pattern);
        if plan.is_empty() {
            warn!("No search pattern given in {:?}", pattern);
        }

        let mut files = Vec::new();
        for (root, globs) in plan {
            debug!("Searching {} for {}", root.display(), globs.join(", "));

            let walker = GlobWalkerBuilder::from_patterns(&root, &globs)
                .follow_links(false)
                .file_type(FileType::FILE)
                .build()?;

            files.extend(walker.filter_map(|entry| match entry {
                Ok(entry) => Some(entry.into_path()),
                Err(e) => {
                    warn!("Skipping unreadable path while searching reports: {}", e);
                    None
                }
            }));
        }
        files.sort();
        files.dedup();

        Ok(files)
    })
    .await
    .map_err(|e| AppError::Glob(format!("Report discovery task failed: {}", e)))?
}
