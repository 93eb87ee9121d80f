use tokio::sync::broadcast;

use super::ledger::{RunSummary, ScenarioRecord};
use crate::driver::FailureKind;

/// Run progress events for real-time console updates
#[derive(Debug, Clone)]
pub enum RunEvent {
    SessionStarted {
        session_id: String,
        base_url: String,
        scenario_count: usize,
    },
    ScenarioStarted {
        index: usize,
        label: String,
    },
    ScenarioPassed {
        index: usize,
        label: String,
        duration_ms: u64,
    },
    ScenarioFailed {
        index: usize,
        label: String,
        kind: FailureKind,
        error: String,
        duration_ms: u64,
    },
    SessionFinished {
        records: Vec<ScenarioRecord>,
        summary: RunSummary,
    },
}

/// Event emitter for broadcasting run events
pub struct EventEmitter {
    sender: broadcast::Sender<RunEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<RunEvent>) {
        let (sender, receiver) = broadcast::channel(64);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: RunEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }
}

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration as StdDuration;

/// Console event listener printing live scenario progress
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    pub async fn listen(mut receiver: broadcast::Receiver<RunEvent>) {
        use colored::Colorize;
        use indicatif::ProgressDrawTarget;
        use std::io::IsTerminal;

        // Hidden draw target when output is piped, to keep logs free of
        // terminal escape codes.
        let multi = if std::io::stdout().is_terminal() {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let mut spinner: Option<ProgressBar> = None;
        let mut current_label = String::new();

        while let Ok(event) = receiver.recv().await {
            match event {
                RunEvent::SessionStarted {
                    session_id,
                    base_url,
                    scenario_count,
                } => {
                    multi
                        .println(format!(
                            "\n{} Running {} scenarios against {}",
                            "▶".green().bold(),
                            scenario_count,
                            base_url.cyan()
                        ))
                        .ok();
                    multi
                        .println(format!("  Session: {}\n", session_id.dimmed()))
                        .ok();
                }

                RunEvent::ScenarioStarted { index, label } => {
                    let pb = multi.add(ProgressBar::new_spinner());
                    let style = ProgressStyle::default_spinner()
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                        .template("  {spinner} {msg}")
                        .unwrap();
                    pb.set_style(style);
                    current_label = format!("[{}] {}", index + 1, label);
                    pb.set_message(format!("{}...", current_label.clone().dimmed()));
                    pb.enable_steady_tick(StdDuration::from_millis(100));
                    spinner = Some(pb);
                }

                RunEvent::ScenarioPassed { duration_ms, .. } => {
                    let line = format!(
                        "  {} {} {}",
                        "✓".green(),
                        current_label,
                        format!("({}ms)", duration_ms).dimmed()
                    );
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                    }
                    multi.println(line).ok();
                }

                RunEvent::ScenarioFailed {
                    kind,
                    error,
                    duration_ms,
                    ..
                } => {
                    let line = format!(
                        "  {} {} {}",
                        "✗".red(),
                        current_label,
                        format!("({}ms)", duration_ms).dimmed()
                    );
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                    }
                    multi.println(line).ok();
                    multi
                        .println(format!(
                            "      {} {}",
                            format!("[{}]", kind.as_str()).yellow(),
                            error.dimmed()
                        ))
                        .ok();
                }

                RunEvent::SessionFinished { records, summary } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                    }
                    super::ledger::print_summary(&records, &summary);
                }
            }
        }
    }
}
