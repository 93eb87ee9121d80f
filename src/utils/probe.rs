use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;

const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// Poll the target over HTTP until it answers, bounded by `timeout`.
///
/// Any response counts as ready as long as the server is reachable and
/// not failing outright; the scenarios themselves verify behavior.
pub async fn wait_until_ready(base_url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();

    println!("{} Waiting for {} to become ready...", "⧗".blue(), base_url);

    loop {
        match client.get(base_url).send().await {
            Ok(response) if !response.status().is_server_error() => {
                log::info!(
                    "target ready after {}ms ({})",
                    start.elapsed().as_millis(),
                    response.status()
                );
                return Ok(());
            }
            Ok(response) => {
                log::debug!("target answered {}", response.status());
            }
            Err(err) => {
                log::debug!("target not reachable yet: {}", err);
            }
        }

        if start.elapsed() >= timeout {
            anyhow::bail!(
                "target {} not ready after {}s",
                base_url,
                timeout.as_secs()
            );
        }
        tokio::time::sleep(PROBE_INTERVAL).await;
    }
}
