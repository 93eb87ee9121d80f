use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;

use flowcheck::driver::{BrowserType, WebDriverConfig};
use flowcheck::runner::{run_flow, RunOptions};
use flowcheck::utils::config::RunnerConfig;
use flowcheck::{generate_report, scenarios};

#[derive(Parser)]
#[command(name = "flowcheck")]
#[command(version = "0.1.0")]
#[command(about = "Browser UI flow smoke-testing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario sequence against the target application
    Run {
        /// Network address of the application under test
        #[arg(short, long)]
        base_url: Option<String>,

        /// Browser to drive (chromium, firefox, webkit)
        #[arg(long, default_value = "chromium")]
        browser: String,

        /// Run with a visible browser window
        #[arg(long, default_value = "false")]
        headed: bool,

        /// Output directory for report artifacts
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Write JSON and JUnit reports after the run
        #[arg(long, default_value = "false")]
        report: bool,

        /// Exit non-zero when any scenario failed (for CI gating)
        #[arg(long, default_value = "false")]
        ci: bool,

        /// Poll the target for up to this many seconds before starting
        #[arg(long)]
        wait_ready: Option<u64>,

        /// Bound for content waits in milliseconds
        #[arg(long, default_value = "10000")]
        timeout_ms: u64,
    },

    /// Generate report from saved run results
    Report {
        /// Path to run results JSON
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "junit")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            base_url,
            browser,
            headed,
            output,
            report,
            ci,
            wait_ready,
            timeout_ms,
        } => {
            let browser_type = BrowserType::parse(&browser)
                .ok_or_else(|| anyhow::anyhow!("Unknown browser: {}", browser))?;

            let mut web_config = WebDriverConfig {
                browser_type,
                ..WebDriverConfig::default()
            };
            if let Some(url) = base_url {
                web_config.base_url = url;
            }
            if headed {
                web_config.headless = false;
            }

            let runner_config = RunnerConfig {
                wait_timeout_ms: timeout_ms,
            };

            println!(
                "{} Running UI flows against: {}",
                "▶".green().bold(),
                web_config.base_url.cyan()
            );
            println!("  Browser: {}", browser.cyan());
            println!(
                "  Scenarios: {}",
                scenarios::ScenarioId::all().len().to_string().cyan()
            );
            println!("  Output: {}", output.display().to_string().cyan());
            if report {
                println!("  Reports: {}", "Enabled".green());
            }
            if ci {
                println!("  CI mode: {}", "Enabled".yellow());
            }

            let options = RunOptions {
                output_dir: output,
                write_reports: report,
                wait_ready: wait_ready.map(Duration::from_secs),
            };

            let run_report = run_flow(web_config, runner_config, options).await?;

            if ci && run_report.summary.failed > 0 {
                std::process::exit(1);
            }
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "▶".blue(),
                format.cyan(),
                results.display()
            );
            generate_report(&results, &format, output.as_deref()).await?;
        }
    }

    Ok(())
}
