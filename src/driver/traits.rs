use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element selector for page elements
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Select by element id attribute
    Id(String),
    /// Select by CSS selector
    Css(String),
    /// Select by tag name (e.g. "form")
    Tag(String),
    /// Select by visible text (links, buttons)
    Text(String),
    /// Select by XPath expression
    XPath(String),
}

impl Selector {
    pub fn id(id: &str) -> Self {
        Selector::Id(id.to_string())
    }

    pub fn tag(tag: &str) -> Self {
        Selector::Tag(tag.to_string())
    }

    pub fn text(text: &str) -> Self {
        Selector::Text(text.to_string())
    }
}

/// Broad category of a scenario failure, carried into the ledger and
/// reports so a run distinguishes infrastructure failures from
/// application-behavior failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Navigation,
    ElementLookup,
    Timeout,
    Assertion,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Navigation => "navigation",
            FailureKind::ElementLookup => "element_lookup",
            FailureKind::Timeout => "timeout",
            FailureKind::Assertion => "assertion",
        }
    }
}

/// Failure signaled by a scenario or by the driver operations it calls.
///
/// Scenarios never panic and never abort the run; every error of this
/// type is converted into a failed ledger record at the scenario
/// boundary.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("element lookup failed: {0}")]
    ElementLookup(String),

    #[error("timed out after {timeout_ms}ms waiting for: {condition}")]
    Timeout { condition: String, timeout_ms: u64 },

    #[error("assertion failed: {0}")]
    Assertion(String),
}

impl ScenarioError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ScenarioError::Navigation(_) => FailureKind::Navigation,
            ScenarioError::ElementLookup(_) => FailureKind::ElementLookup,
            ScenarioError::Timeout { .. } => FailureKind::Timeout,
            ScenarioError::Assertion(_) => FailureKind::Assertion,
        }
    }
}

/// Abstract browser session used by scenarios.
///
/// One live session is shared by the whole run: scenarios mutate it in
/// sequence and later scenarios see the side effects of earlier ones.
/// Implementations must keep the session usable after a failed call so
/// the run can proceed to the next scenario.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to a path relative to the configured base URL
    /// (absolute URLs are passed through). Blocks until the page load
    /// signal fires.
    async fn goto(&self, path: &str) -> Result<(), ScenarioError>;

    /// Replace the value of the matched input with `text`.
    async fn fill(&self, selector: &Selector, text: &str) -> Result<(), ScenarioError>;

    /// Click the matched element.
    async fn click(&self, selector: &Selector) -> Result<(), ScenarioError>;

    /// Submit the form matched by `selector`.
    async fn submit(&self, selector: &Selector) -> Result<(), ScenarioError>;

    /// Full rendered page markup, for content assertions.
    async fn page_source(&self) -> Result<String, ScenarioError>;

    /// Poll until `text` appears in the page markup, bounded by
    /// `timeout_ms`.
    async fn wait_for_text(&self, text: &str, timeout_ms: u64) -> Result<(), ScenarioError>;

    /// Poll until `text` is absent from the page markup, bounded by
    /// `timeout_ms`.
    async fn wait_for_text_absent(&self, text: &str, timeout_ms: u64)
        -> Result<(), ScenarioError>;

    /// Release the session. Called exactly once, after the last
    /// scenario, regardless of scenario outcomes.
    async fn close(&self) -> Result<(), ScenarioError>;
}

/// Assert that the current page markup contains `needle`.
pub async fn assert_page_contains(
    driver: &dyn BrowserDriver,
    needle: &str,
) -> Result<(), ScenarioError> {
    let source = driver.page_source().await?;
    if source.contains(needle) {
        Ok(())
    } else {
        Err(ScenarioError::Assertion(format!(
            "expected page to contain {:?}",
            needle
        )))
    }
}

/// Assert that the current page markup contains at least one of
/// `needles`.
pub async fn assert_page_contains_any(
    driver: &dyn BrowserDriver,
    needles: &[&str],
) -> Result<(), ScenarioError> {
    let source = driver.page_source().await?;
    if needles.iter().any(|n| source.contains(n)) {
        Ok(())
    } else {
        Err(ScenarioError::Assertion(format!(
            "expected page to contain one of {:?}",
            needles
        )))
    }
}
