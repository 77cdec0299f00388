use crate::common::constants::{EXIT_ITEM_FAILED, EXIT_OK};
use crate::common::error::ErrorKind;
use crate::domain::EventKey;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Written { rows: usize },
    Failed { kind: ErrorKind, message: String },
}

/// Outcome of one executed plan item. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub key: EventKey,
    pub output_path: PathBuf,
    pub outcome: FetchOutcome,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Written { .. })
    }
}

/// Aggregate of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub results: Vec<FetchResult>,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: FetchResult) {
        self.results.push(result);
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn exit_code(&self) -> u8 {
        if self.has_failures() {
            EXIT_ITEM_FAILED
        } else {
            EXIT_OK
        }
    }

    /// Trailing report: per-failure lines with enough identity to re-run, then counts.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for result in self.failures() {
            if let FetchOutcome::Failed { kind, message } = &result.outcome {
                let _ = writeln!(out, "FAILED [{kind}] {}: {message}", result.key);
            }
        }
        let _ = writeln!(
            out,
            "{} succeeded, {} failed, {} skipped",
            self.succeeded(),
            self.failed(),
            self.skipped
        );
        out
    }
}
