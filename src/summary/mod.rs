//! Suite result classification and summary-line extraction.
//!
//! Extraction is a pluggable strategy: the default matches the rspec summary
//! line ("12 examples, 2 failures, 1 pending"), but a custom
//! [`SummaryExtractor`] can be injected for suites with a different output
//! shape.


use crate::log_debug;
use regex::Regex;
use std::fmt;

/// Overall outcome of one suite run. Failures dominate pending, which
/// dominates success; this ordering is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Pending,
    Failure,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Pending => "pending",
            Status::Failure => "failure",
        }
    }
}

/// Classify a result count triple. `examples` never affects the outcome but
/// stays in the signature because custom extractors report it.
pub fn classify(_examples: u32, failures: u32, pending: u32) -> Status {
    if failures > 0 {
        Status::Failure
    } else if pending > 0 {
        Status::Pending
    } else {
        Status::Success
    }
}

/// Counts parsed from the summary line, built once per run.
#[derive(Debug, Clone)]
pub struct ResultStats {
    pub examples: u32,
    pub failures: u32,
    pub pending: u32,
    pub summary: String,
    pub status: Status,
}

impl ResultStats {
    pub fn new(examples: u32, failures: u32, pending: u32, summary: String) -> Self {
        let status = classify(examples, failures, pending);
        Self {
            examples,
            failures,
            pending,
            summary,
            status,
        }
    }
}

/// The summary line at the configured index did not match the expected
/// pattern, or the index was out of range.
#[derive(Debug, Clone)]
pub struct ExtractionError {
    pub line_index: i64,
    pub line: Option<String>,
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.line {
            Some(line) => write!(
                f,
                "summary line {} did not match the expected pattern: {line:?}",
                self.line_index
            ),
            None => write!(f, "summary line index {} is out of range", self.line_index),
        }
    }
}

impl std::error::Error for ExtractionError {}

/// Strategy mapping raw suite output plus a line index to parsed stats.
/// Negative indices count from the last line.
pub trait SummaryExtractor {
    fn extract(&self, output: &str, line_index: i64) -> Result<ResultStats, ExtractionError>;
}

/// Default extractor for the rspec summary format.
pub struct RspecSummaryExtractor {
    summary_re: Regex,
}

impl Default for RspecSummaryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RspecSummaryExtractor {
    pub fn new() -> Self {
        let summary_re =
            Regex::new(r"^(\d+)\s+examples?,\s+(\d+)\s+(?:errors?|failures?)(?:\D*?(\d+)\s+pending)?")
                .expect("summary regex is valid");
        Self { summary_re }
    }
}

impl SummaryExtractor for RspecSummaryExtractor {
    fn extract(&self, output: &str, line_index: i64) -> Result<ResultStats, ExtractionError> {
        // rspec is commonly run with --color; strip escapes before matching.
        let plain = strip_ansi_escapes::strip_str(output);
        let line = select_line(&plain, line_index).ok_or(ExtractionError {
            line_index,
            line: None,
        })?;
        let caps = self.summary_re.captures(line).ok_or_else(|| ExtractionError {
            line_index,
            line: Some(line.to_string()),
        })?;
        let count = |i: usize| -> u32 {
            caps.get(i)
                .map(|m| m.as_str().parse().unwrap_or(0))
                .unwrap_or(0)
        };
        Ok(ResultStats::new(
            count(1),
            count(2),
            count(3),
            line.to_string(),
        ))
    }
}

/// Pick a line by index, negative counting from the end (-1 = last line).
fn select_line(output: &str, index: i64) -> Option<&str> {
    let lines: Vec<&str> = output.lines().collect();
    let n = lines.len() as i64;
    let idx = if index < 0 { n + index } else { index };
    if (0..n).contains(&idx) {
        Some(lines[idx as usize])
    } else {
        None
    }
}

/// Recovery collaborator for extraction failures: asked for a corrected line
/// index; `None` means give up and surface the error.
pub trait LineIndexPrompt {
    fn corrected_index(&mut self, failed: &ExtractionError) -> Option<i64>;
}

/// Run extraction, asking the prompt for a new line index after each
/// failure until it matches or the prompt declines.
pub fn extract_with_recovery(
    extractor: &dyn SummaryExtractor,
    prompt: &mut dyn LineIndexPrompt,
    output: &str,
    mut line_index: i64,
) -> Result<ResultStats, ExtractionError> {
    loop {
        match extractor.extract(output, line_index) {
            Ok(stats) => return Ok(stats),
            Err(err) => {
                log_debug(&format!("summary extraction failed: {err}"));
                match prompt.corrected_index(&err) {
                    Some(idx) => line_index = idx,
                    None => return Err(err),
                }
            }
        }
    }
}

/// Stdin-backed [`LineIndexPrompt`] used by the CLI.
pub struct StdinLineIndexPrompt;

impl LineIndexPrompt for StdinLineIndexPrompt {
    fn corrected_index(&mut self, failed: &ExtractionError) -> Option<i64> {
        use std::io::{self, BufRead, Write};
        eprintln!("--- Error while extracting summary: {failed}");
        eprint!("--- Summary line number (blank to abort): ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return None;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse().ok()
    }
}
