//! Article scenarios: creation page, create, show, edit, delete.
//!
//! These form one stateful chain over the shared session: the article
//! created here is the one shown, edited, and finally deleted.

use crate::driver::traits::{assert_page_contains, BrowserDriver, ScenarioError, Selector};
use crate::utils::config::RunnerConfig;

use super::{ARTICLE_DESCRIPTION, ARTICLE_MARKDOWN, ARTICLE_TITLE, UPDATED_TITLE};

/// Open the creation page and wait for its marker text.
pub async fn open_new_article_page(
    driver: &dyn BrowserDriver,
    config: &RunnerConfig,
) -> Result<(), ScenarioError> {
    driver.goto("/articles/new").await?;
    driver
        .wait_for_text("New Article", config.wait_timeout_ms)
        .await
}

/// Fill and submit the creation form, then wait for the detail view to
/// show the title.
pub async fn create_article(
    driver: &dyn BrowserDriver,
    config: &RunnerConfig,
) -> Result<(), ScenarioError> {
    driver.fill(&Selector::id("title"), ARTICLE_TITLE).await?;
    driver
        .fill(&Selector::id("description"), ARTICLE_DESCRIPTION)
        .await?;
    driver
        .fill(&Selector::id("markdown"), ARTICLE_MARKDOWN)
        .await?;
    driver.submit(&Selector::tag("form")).await?;
    driver
        .wait_for_text(ARTICLE_TITLE, config.wait_timeout_ms)
        .await
}

/// Idempotent re-check of the rendered detail view.
pub async fn show_article(
    driver: &dyn BrowserDriver,
    _config: &RunnerConfig,
) -> Result<(), ScenarioError> {
    assert_page_contains(driver, ARTICLE_TITLE).await
}

/// Follow the Edit link, replace the title, resubmit.
pub async fn edit_article(
    driver: &dyn BrowserDriver,
    config: &RunnerConfig,
) -> Result<(), ScenarioError> {
    driver.click(&Selector::text("Edit")).await?;
    driver.fill(&Selector::id("title"), UPDATED_TITLE).await?;
    driver.submit(&Selector::tag("form")).await?;
    driver
        .wait_for_text(UPDATED_TITLE, config.wait_timeout_ms)
        .await
}

/// Invoke the delete control scoped to the edited article's card, then
/// wait for the title to disappear from the listing.
pub async fn delete_article(
    driver: &dyn BrowserDriver,
    config: &RunnerConfig,
) -> Result<(), ScenarioError> {
    driver.goto("/").await?;
    driver
        .click(&Selector::XPath(delete_control_xpath(UPDATED_TITLE)))
        .await?;
    driver
        .wait_for_text_absent(UPDATED_TITLE, config.wait_timeout_ms)
        .await
}

/// Delete button inside the card rendering the article with `title`.
pub fn delete_control_xpath(title: &str) -> String {
    format!(
        "//h4[contains(.,'{}')]/ancestor::div[contains(@class,'card')]\
         //form[contains(.,'Delete')]//button",
        title
    )
}
