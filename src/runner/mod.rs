pub mod events;
pub mod ledger;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use uuid::Uuid;

use crate::driver::{BrowserDriver, WebDriver, WebDriverConfig};
use crate::report::types::RunReport;
use crate::scenarios::ScenarioId;
use crate::utils::config::RunnerConfig;

use events::{ConsoleEventListener, EventEmitter, RunEvent};
use ledger::{Ledger, ScenarioStatus};

/// Options for a single run of the flow sequence
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory for report artifacts.
    pub output_dir: PathBuf,
    /// Write JSON and JUnit reports after the run.
    pub write_reports: bool,
    /// Poll the target over HTTP for up to this long before launching
    /// the browser.
    pub wait_ready: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            write_reports: false,
            wait_ready: None,
        }
    }
}

/// Executes the scenario sequence against one shared browser session
/// and records every outcome in the ledger.
pub struct FlowRunner {
    driver: Box<dyn BrowserDriver>,
    config: RunnerConfig,
    ledger: Ledger,
    emitter: EventEmitter,
    session_id: String,
    started_at: Instant,
}

impl FlowRunner {
    pub fn new(driver: Box<dyn BrowserDriver>, config: RunnerConfig) -> Self {
        let (emitter, receiver) = EventEmitter::new();
        tokio::spawn(ConsoleEventListener::listen(receiver));

        Self {
            driver,
            config,
            ledger: Ledger::new(),
            emitter,
            session_id: Uuid::new_v4().to_string(),
            started_at: Instant::now(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Run the whole sequence in order.
    pub async fn run_all(&mut self, scenarios: &[ScenarioId], base_url: &str) {
        self.emitter.emit(RunEvent::SessionStarted {
            session_id: self.session_id.clone(),
            base_url: base_url.to_string(),
            scenario_count: scenarios.len(),
        });

        for (index, scenario) in scenarios.iter().enumerate() {
            self.run_scenario(index, *scenario).await;
        }
    }

    /// Run one scenario and record its outcome.
    ///
    /// Failures are converted into ledger records here and never
    /// propagate further; one broken scenario must not abort the rest
    /// of the run, since later scenarios are diagnostic signal too.
    pub async fn run_scenario(&mut self, index: usize, scenario: ScenarioId) {
        let label = scenario.label();
        self.emitter.emit(RunEvent::ScenarioStarted {
            index,
            label: label.to_string(),
        });

        let start = Instant::now();
        let outcome = scenario.run(self.driver.as_ref(), &self.config).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                self.ledger
                    .record(label, ScenarioStatus::Passed, duration_ms);
                self.emitter.emit(RunEvent::ScenarioPassed {
                    index,
                    label: label.to_string(),
                    duration_ms,
                });
            }
            Err(err) => {
                let kind = err.kind();
                let error = err.to_string();
                log::debug!("scenario {:?} failed: {}", label, error);
                self.ledger.record(
                    label,
                    ScenarioStatus::Failed {
                        kind,
                        error: error.clone(),
                    },
                    duration_ms,
                );
                self.emitter.emit(RunEvent::ScenarioFailed {
                    index,
                    label: label.to_string(),
                    kind,
                    error,
                    duration_ms,
                });
            }
        }
    }

    /// Close the session and assemble the final report.
    ///
    /// The session is released here no matter how many scenarios
    /// failed; scenario failures never skip this step.
    pub async fn finish(self) -> RunReport {
        let duration_ms = self.started_at.elapsed().as_millis() as u64;

        if let Err(err) = self.driver.close().await {
            log::warn!("failed to close browser session: {}", err);
        }

        let summary = self.ledger.summary(Some(duration_ms));
        self.emitter.emit(RunEvent::SessionFinished {
            records: self.ledger.records().to_vec(),
            summary: summary.clone(),
        });

        // Give the console listener a beat to drain the channel before
        // the process moves on.
        tokio::time::sleep(Duration::from_millis(200)).await;

        RunReport::new(self.session_id, self.ledger.records().to_vec(), summary)
    }
}

/// Run the full flow: probe the target, launch the browser, execute
/// every scenario, write reports, and return the final report.
pub async fn run_flow(
    web_config: WebDriverConfig,
    runner_config: RunnerConfig,
    options: RunOptions,
) -> Result<RunReport> {
    if let Some(timeout) = options.wait_ready {
        crate::utils::probe::wait_until_ready(&web_config.base_url, timeout).await?;
    }

    let base_url = web_config.base_url.clone();
    let driver = WebDriver::new(web_config).await?;

    let mut runner = FlowRunner::new(Box::new(driver), runner_config);
    runner.run_all(&ScenarioId::all(), &base_url).await;
    let report = runner.finish().await;

    if options.write_reports {
        std::fs::create_dir_all(&options.output_dir)?;

        let json_path = options.output_dir.join("test-results.json");
        std::fs::write(&json_path, serde_json::to_string_pretty(&report)?)?;
        println!("\nJSON report saved to: {}", json_path.display());

        crate::report::junit::write_report(&report, &options.output_dir)?;
    }

    Ok(report)
}
