use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::driver::FailureKind;

/// Outcome of a single scenario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed { kind: FailureKind, error: String },
}

impl ScenarioStatus {
    pub fn is_passed(&self) -> bool {
        matches!(self, ScenarioStatus::Passed)
    }
}

/// One entry in the results ledger, appended in execution order and
/// never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecord {
    pub label: String,
    pub status: ScenarioStatus,
    pub duration_ms: u64,
}

impl ScenarioRecord {
    /// The ✓/✗ line shown for this record in the console report.
    pub fn console_line(&self) -> String {
        match &self.status {
            ScenarioStatus::Passed => format!("{} {}", "✓".green(), self.label),
            ScenarioStatus::Failed { kind, .. } => format!(
                "{} {} {}",
                "✗".red(),
                self.label,
                format!("[{}]", kind.as_str()).dimmed()
            ),
        }
    }
}

/// Aggregate counts for a finished run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub duration_ms: Option<u64>,
}

/// Ordered scenario results plus running pass/fail totals.
///
/// Owned by the runner; `passed + failed == records.len()` holds after
/// every `record` call.
#[derive(Debug, Default)]
pub struct Ledger {
    records: Vec<ScenarioRecord>,
    passed: u32,
    failed: u32,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: &str, status: ScenarioStatus, duration_ms: u64) {
        if status.is_passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.records.push(ScenarioRecord {
            label: label.to_string(),
            status,
            duration_ms,
        });
    }

    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    pub fn passed(&self) -> u32 {
        self.passed
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn summary(&self, duration_ms: Option<u64>) -> RunSummary {
        RunSummary {
            total: self.records.len() as u32,
            passed: self.passed,
            failed: self.failed,
            duration_ms,
        }
    }
}

/// Print the final console report: every recorded line in order under a
/// "Test Summary" header, then the two totals lines.
pub fn print_summary(records: &[ScenarioRecord], summary: &RunSummary) {
    println!();
    println!("{}", "Test Summary".bold());
    for record in records {
        println!("{}", record.console_line());
    }
    println!("Passed: {}", summary.passed.to_string().green());
    println!("Failed: {}", summary.failed.to_string().red());
}
