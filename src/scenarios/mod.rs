pub mod articles;
pub mod auth;

use crate::driver::traits::{BrowserDriver, ScenarioError};
use crate::utils::config::RunnerConfig;

pub use articles::delete_control_xpath;

// Fixed fixtures driven through the application under test.
pub const FULL_NAME: &str = "Test User";
pub const EMAIL: &str = "testuser@example.com";
pub const PASSWORD: &str = "password123";
pub const ARTICLE_TITLE: &str = "Test Article Title";
pub const ARTICLE_DESCRIPTION: &str = "This is a test article.";
pub const ARTICLE_MARKDOWN: &str = "## Markdown content";
pub const UPDATED_TITLE: &str = "Updated Article Title";

/// The named scenarios, in their fixed execution order.
///
/// Order is significant: later scenarios consume side effects of
/// earlier ones (the created article is shown, edited, then deleted)
/// over the one shared session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    Signup,
    LogoutAfterSignup,
    Login,
    NewArticlePage,
    CreateArticle,
    ShowArticle,
    EditArticle,
    DeleteArticle,
    LogoutAfterEditing,
    ProtectedAccess,
}

impl ScenarioId {
    /// All scenarios in execution order.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Signup,
            ScenarioId::LogoutAfterSignup,
            ScenarioId::Login,
            ScenarioId::NewArticlePage,
            ScenarioId::CreateArticle,
            ScenarioId::ShowArticle,
            ScenarioId::EditArticle,
            ScenarioId::DeleteArticle,
            ScenarioId::LogoutAfterEditing,
            ScenarioId::ProtectedAccess,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioId::Signup => "Signup a new user",
            ScenarioId::LogoutAfterSignup => "Logout after signup",
            ScenarioId::Login => "Login with valid credentials",
            ScenarioId::NewArticlePage => "Navigate to New Article page",
            ScenarioId::CreateArticle => "Create a new article",
            ScenarioId::ShowArticle => "Show created article",
            ScenarioId::EditArticle => "Edit article",
            ScenarioId::DeleteArticle => "Delete article",
            ScenarioId::LogoutAfterEditing => "Logout after editing",
            ScenarioId::ProtectedAccess => "Protected route access without login",
        }
    }

    pub async fn run(
        &self,
        driver: &dyn BrowserDriver,
        config: &RunnerConfig,
    ) -> Result<(), ScenarioError> {
        match self {
            ScenarioId::Signup => auth::signup_new_user(driver, config).await,
            ScenarioId::LogoutAfterSignup | ScenarioId::LogoutAfterEditing => {
                auth::logout(driver, config).await
            }
            ScenarioId::Login => auth::login_with_credentials(driver, config).await,
            ScenarioId::NewArticlePage => articles::open_new_article_page(driver, config).await,
            ScenarioId::CreateArticle => articles::create_article(driver, config).await,
            ScenarioId::ShowArticle => articles::show_article(driver, config).await,
            ScenarioId::EditArticle => articles::edit_article(driver, config).await,
            ScenarioId::DeleteArticle => articles::delete_article(driver, config).await,
            ScenarioId::ProtectedAccess => auth::protected_access(driver, config).await,
        }
    }
}
