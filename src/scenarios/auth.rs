//! Account scenarios: signup, logout, login, and the unauthenticated
//! access check.

use crate::driver::traits::{assert_page_contains_any, BrowserDriver, ScenarioError, Selector};
use crate::utils::config::RunnerConfig;

use super::{EMAIL, FULL_NAME, PASSWORD};

/// Register the fixed account through the signup form.
pub async fn signup_new_user(
    driver: &dyn BrowserDriver,
    _config: &RunnerConfig,
) -> Result<(), ScenarioError> {
    driver.goto("/auth/signup").await?;
    driver.fill(&Selector::id("fullName"), FULL_NAME).await?;
    driver.fill(&Selector::id("email"), EMAIL).await?;
    driver.fill(&Selector::id("password"), PASSWORD).await?;
    driver.submit(&Selector::tag("form")).await
}

/// End the current session through the logout route.
pub async fn logout(
    driver: &dyn BrowserDriver,
    _config: &RunnerConfig,
) -> Result<(), ScenarioError> {
    driver.goto("/auth/logout").await
}

/// Sign in with the credentials registered at signup.
pub async fn login_with_credentials(
    driver: &dyn BrowserDriver,
    _config: &RunnerConfig,
) -> Result<(), ScenarioError> {
    driver.goto("/auth/login").await?;
    driver.fill(&Selector::id("email"), EMAIL).await?;
    driver.fill(&Selector::id("password"), PASSWORD).await?;
    driver.submit(&Selector::tag("form")).await
}

/// Open the protected listing while logged out and expect an
/// authentication prompt.
pub async fn protected_access(
    driver: &dyn BrowserDriver,
    _config: &RunnerConfig,
) -> Result<(), ScenarioError> {
    driver.goto("/articles").await?;
    assert_page_contains_any(driver, &["Login", "Sign Up"]).await
}
