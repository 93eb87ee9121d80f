//! Web driver implementation using Playwright
//!
//! One browser session is launched per run and shared by every
//! scenario; it is closed once, after the last scenario.

use async_trait::async_trait;
use playwright::api::{Browser, BrowserContext, Page, Viewport};
use playwright::Playwright;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::driver::traits::{BrowserDriver, ScenarioError, Selector};

/// Poll cadence for the bounded text waits.
const POLL_INTERVAL_MS: u64 = 200;

/// Web browser type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserType {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chromium" | "chrome" => Some(BrowserType::Chromium),
            "firefox" => Some(BrowserType::Firefox),
            "webkit" => Some(BrowserType::Webkit),
            _ => None,
        }
    }
}

/// Web driver configuration
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub browser_type: BrowserType,
    pub headless: bool,
    /// Network address of the application under test.
    pub base_url: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        let headless = std::env::var("FLOWCHECK_HEADLESS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        let base_url = std::env::var("FLOWCHECK_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Self {
            browser_type: BrowserType::Chromium,
            headless,
            base_url,
            viewport_width: 1920,
            viewport_height: 1080,
        }
    }
}

/// Browser session driven through Playwright
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Arc<Playwright>,
    browser: Arc<Browser>,
    #[allow(dead_code)]
    context: Arc<BrowserContext>,
    page: Arc<Mutex<Page>>,
    config: WebDriverConfig,
}

impl WebDriver {
    /// Launch a browser and open the session page.
    pub async fn new(config: WebDriverConfig) -> anyhow::Result<Self> {
        let playwright = Playwright::initialize().await?;

        let browser = match config.browser_type {
            BrowserType::Chromium => {
                let chromium = playwright.chromium();
                let executable = browser_executable();
                let profile_dir = std::env::temp_dir().join("flowcheck-profile");
                let args: Vec<String> = vec![
                    "--no-sandbox".to_string(),
                    "--disable-setuid-sandbox".to_string(),
                    "--disable-dev-shm-usage".to_string(),
                    "--disable-gpu".to_string(),
                    format!("--user-data-dir={}", profile_dir.display()),
                ];

                let mut launcher = chromium.launcher().headless(config.headless).args(&args);
                if let Some(ref path) = executable {
                    log::info!("using browser executable: {}", path.display());
                    launcher = launcher.executable(path);
                }

                launcher.launch().await?
            }
            BrowserType::Firefox => {
                playwright
                    .firefox()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await?
            }
            BrowserType::Webkit => {
                playwright
                    .webkit()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await?
            }
        };

        let context = browser.context_builder().build().await?;
        let page = context.new_page().await?;

        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await?;

        Ok(Self {
            playwright: Arc::new(playwright),
            browser: Arc::new(browser),
            context: Arc::new(context),
            page: Arc::new(Mutex::new(page)),
            config,
        })
    }
}

/// Resolve a path against the base URL; absolute URLs pass through.
fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Convert a Selector into a Playwright selector string.
fn selector_string(selector: &Selector) -> String {
    match selector {
        Selector::Id(id) => format!("#{}", id),
        Selector::Css(css) => css.clone(),
        Selector::Tag(tag) => tag.clone(),
        Selector::Text(text) => format!("text=\"{}\"", text),
        Selector::XPath(xpath) => format!("xpath={}", xpath),
    }
}

/// Browser executable override, checked before Playwright's default
/// resolution. Mirrors the common Chrome/Chromium install locations.
fn browser_executable() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("FLOWCHECK_BROWSER_PATH") {
        return Some(PathBuf::from(path));
    }

    let common_paths = [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];

    common_paths
        .iter()
        .map(std::path::Path::new)
        .find(|p| p.exists())
        .map(|p| p.to_path_buf())
}

#[async_trait]
impl BrowserDriver for WebDriver {
    async fn goto(&self, path: &str) -> Result<(), ScenarioError> {
        let url = resolve_url(&self.config.base_url, path);
        let page = self.page.lock().await;
        page.goto_builder(&url)
            .goto()
            .await
            .map_err(|e| ScenarioError::Navigation(format!("{}: {:?}", url, e)))?;
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<(), ScenarioError> {
        let sel = selector_string(selector);
        let page = self.page.lock().await;
        let element = page
            .query_selector(&sel)
            .await
            .map_err(|e| ScenarioError::ElementLookup(format!("{}: {:?}", sel, e)))?
            .ok_or_else(|| ScenarioError::ElementLookup(format!("no element matches {}", sel)))?;
        element
            .fill_builder(text)
            .fill()
            .await
            .map_err(|e| ScenarioError::ElementLookup(format!("fill {}: {:?}", sel, e)))?;
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> Result<(), ScenarioError> {
        let sel = selector_string(selector);
        let page = self.page.lock().await;
        page.click_builder(&sel)
            .click()
            .await
            .map_err(|e| ScenarioError::ElementLookup(format!("click {}: {:?}", sel, e)))?;
        Ok(())
    }

    async fn submit(&self, selector: &Selector) -> Result<(), ScenarioError> {
        let sel = selector_string(selector);
        let page = self.page.lock().await;
        page.evaluate_on_selector::<(), ()>(&sel, "form => form.submit()", None)
            .await
            .map_err(|e| ScenarioError::ElementLookup(format!("submit {}: {:?}", sel, e)))?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String, ScenarioError> {
        let page = self.page.lock().await;
        page.content()
            .await
            .map_err(|e| ScenarioError::Navigation(format!("read page content: {:?}", e)))
    }

    async fn wait_for_text(&self, text: &str, timeout_ms: u64) -> Result<(), ScenarioError> {
        let start = Instant::now();
        loop {
            if self.page_source().await?.contains(text) {
                return Ok(());
            }
            if start.elapsed().as_millis() >= timeout_ms as u128 {
                return Err(ScenarioError::Timeout {
                    condition: format!("text {:?}", text),
                    timeout_ms,
                });
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    async fn wait_for_text_absent(
        &self,
        text: &str,
        timeout_ms: u64,
    ) -> Result<(), ScenarioError> {
        let start = Instant::now();
        loop {
            if !self.page_source().await?.contains(text) {
                return Ok(());
            }
            if start.elapsed().as_millis() >= timeout_ms as u128 {
                return Err(ScenarioError::Timeout {
                    condition: format!("absence of text {:?}", text),
                    timeout_ms,
                });
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    async fn close(&self) -> Result<(), ScenarioError> {
        self.browser
            .close()
            .await
            .map_err(|e| ScenarioError::Navigation(format!("close browser: {:?}", e)))
    }
}
