pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use std::path::Path;

/// Generate a report from saved run results
pub async fn generate_report(results_path: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let raw = std::fs::read_to_string(results_path)?;
    let report: types::RunReport = serde_json::from_str(&raw)?;

    match format {
        "json" => json::generate(&report, output).await,
        "junit" => junit::generate(&report, output).await,
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}
