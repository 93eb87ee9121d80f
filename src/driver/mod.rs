pub mod traits;
pub mod web;

#[cfg(test)]
pub mod fake;

pub use traits::{BrowserDriver, FailureKind, ScenarioError, Selector};
pub use web::{BrowserType, WebDriver, WebDriverConfig};
