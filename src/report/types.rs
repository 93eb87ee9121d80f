use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::runner::ledger::{RunSummary, ScenarioRecord};

/// Serializable snapshot of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub session_id: String,
    pub records: Vec<ScenarioRecord>,
    pub summary: RunSummary,
    pub generated_at: String,
}

impl RunReport {
    pub fn new(session_id: String, records: Vec<ScenarioRecord>, summary: RunSummary) -> Self {
        Self {
            session_id,
            records,
            summary,
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
