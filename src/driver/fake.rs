//! In-memory browser/app double used by unit tests.
//!
//! Models just enough of the target application (accounts, one session,
//! article storage, server-rendered markup per route) for the scenario
//! sequence to run without a real browser. Waits check the current
//! render immediately instead of polling.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::driver::traits::{BrowserDriver, ScenarioError, Selector};

#[derive(Clone)]
struct Article {
    title: String,
    description: String,
    markdown: String,
}

#[derive(Default)]
struct AppState {
    /// email -> (full name, password)
    users: HashMap<String, (String, String)>,
    session_user: Option<String>,
    articles: Vec<Article>,
    route: String,
    /// Pending input values keyed by field id.
    form: HashMap<String, String>,
    /// Rendered markup of the current page.
    source: String,
    /// Article shown by the current detail or edit page.
    detail_index: Option<usize>,
    closed: u32,
}

impl AppState {
    fn nav(&self) -> String {
        if self.session_user.is_some() {
            "<nav><a href=\"/auth/logout\">Logout</a></nav>".to_string()
        } else {
            "<nav><a href=\"/auth/login\">Login</a> <a href=\"/auth/signup\">Sign Up</a></nav>"
                .to_string()
        }
    }

    fn render_home(&mut self) {
        let mut body = String::new();
        for article in &self.articles {
            body.push_str(&format!(
                "<div class=\"card\"><h4>{}</h4><p>{}</p>\
                 <form method=\"post\">Delete<button type=\"submit\">Delete</button></form></div>",
                article.title, article.description
            ));
        }
        self.route = "/".to_string();
        self.source = format!("{}<h1>Articles</h1>{}", self.nav(), body);
        self.detail_index = None;
    }

    fn render_signup(&mut self) {
        self.route = "/auth/signup".to_string();
        self.source = format!(
            "{}<h1>Sign Up</h1><form method=\"post\">\
             <input id=\"fullName\"><input id=\"email\"><input id=\"password\"></form>",
            self.nav()
        );
    }

    fn render_login(&mut self, error: Option<&str>) {
        self.route = "/auth/login".to_string();
        self.source = format!(
            "{}<h1>Login</h1>{}<form method=\"post\">\
             <input id=\"email\"><input id=\"password\"></form>",
            self.nav(),
            error.unwrap_or("")
        );
    }

    fn render_new_article(&mut self) {
        self.route = "/articles/new".to_string();
        self.source = format!(
            "{}<h1>New Article</h1><form method=\"post\">\
             <input id=\"title\"><input id=\"description\"><textarea id=\"markdown\"></textarea>\
             </form>",
            self.nav()
        );
    }

    fn render_detail(&mut self, index: usize) {
        let article = self.articles[index].clone();
        self.route = format!("/articles/{}", index);
        self.detail_index = Some(index);
        self.source = format!(
            "{}<h1>{}</h1><p>{}</p><div>{}</div><a href=\"{}/edit\">Edit</a>",
            self.nav(),
            article.title,
            article.description,
            article.markdown,
            self.route
        );
    }

    fn render_edit(&mut self, index: usize) {
        let article = self.articles[index].clone();
        self.route = format!("/articles/{}/edit", index);
        self.detail_index = Some(index);
        self.source = format!(
            "{}<h1>Edit Article</h1><form method=\"post\">\
             <input id=\"title\"><input id=\"description\"><textarea id=\"markdown\"></textarea>\
             </form>",
            self.nav()
        );
        self.form.insert("title".to_string(), article.title);
        self.form
            .insert("description".to_string(), article.description);
        self.form.insert("markdown".to_string(), article.markdown);
    }

    fn render_error(&mut self, route: &str) {
        self.route = route.to_string();
        self.source = "<h1>Internal Server Error</h1>".to_string();
        self.detail_index = None;
    }
}

/// Test double implementing [`BrowserDriver`] against the in-memory app.
pub struct FakeDriver {
    state: Arc<Mutex<AppState>>,
    /// Routes that render an error page instead of their content.
    broken_routes: Vec<String>,
}

/// Inspection handle into the fake app's state, valid after the driver
/// itself has been handed to a runner.
#[derive(Clone)]
pub struct FakeHandle {
    state: Arc<Mutex<AppState>>,
}

impl FakeHandle {
    pub fn close_count(&self) -> u32 {
        self.state.lock().unwrap().closed
    }

    pub fn logged_in(&self) -> bool {
        self.state.lock().unwrap().session_user.is_some()
    }

    pub fn article_titles(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .articles
            .iter()
            .map(|a| a.title.clone())
            .collect()
    }
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState::default())),
            broken_routes: Vec::new(),
        }
    }

    /// A driver whose app serves an error page for `route`.
    pub fn with_broken_route(route: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState::default())),
            broken_routes: vec![route.to_string()],
        }
    }

    pub fn handle(&self) -> FakeHandle {
        FakeHandle {
            state: self.state.clone(),
        }
    }
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the quoted title out of a delete-control XPath like
/// `//h4[contains(.,'Some Title')]/...`.
fn xpath_title(xpath: &str) -> Option<&str> {
    let start = xpath.find("contains(.,'")? + "contains(.,'".len();
    let rest = &xpath[start..];
    let end = rest.find("')")?;
    Some(&rest[..end])
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn goto(&self, path: &str) -> Result<(), ScenarioError> {
        let mut state = self.state.lock().unwrap();
        state.form.clear();

        let route = path.trim_end_matches('/');
        let route = if route.is_empty() { "/" } else { route };

        if self.broken_routes.iter().any(|r| r == route) {
            state.render_error(route);
            return Ok(());
        }

        match route {
            "/" => state.render_home(),
            "/auth/signup" => state.render_signup(),
            "/auth/login" => state.render_login(None),
            "/auth/logout" => {
                state.session_user = None;
                state.render_home();
            }
            "/articles" => {
                if state.session_user.is_some() {
                    state.render_home();
                } else {
                    state.render_login(None);
                }
            }
            "/articles/new" => {
                if state.session_user.is_some() {
                    state.render_new_article();
                } else {
                    state.render_login(None);
                }
            }
            other => return Err(ScenarioError::Navigation(format!("no route {}", other))),
        }
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<(), ScenarioError> {
        let mut state = self.state.lock().unwrap();
        let field = match selector {
            Selector::Id(id) => id.clone(),
            other => {
                return Err(ScenarioError::ElementLookup(format!(
                    "fill expects an id selector, got {:?}",
                    other
                )))
            }
        };
        if !state.source.contains(&format!("id=\"{}\"", field)) {
            return Err(ScenarioError::ElementLookup(format!(
                "no input #{} on {}",
                field, state.route
            )));
        }
        state.form.insert(field, text.to_string());
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> Result<(), ScenarioError> {
        let mut state = self.state.lock().unwrap();
        match selector {
            Selector::Text(text) if text == "Edit" => {
                let index = state.detail_index.filter(|_| state.source.contains(">Edit<"));
                match index {
                    Some(i) => {
                        state.render_edit(i);
                        Ok(())
                    }
                    None => Err(ScenarioError::ElementLookup(format!(
                        "no Edit link on {}",
                        state.route
                    ))),
                }
            }
            Selector::XPath(xpath) if xpath.contains("Delete") => {
                let title = xpath_title(xpath).ok_or_else(|| {
                    ScenarioError::ElementLookup(format!("unsupported xpath {}", xpath))
                })?;
                let position = state.articles.iter().position(|a| a.title == title);
                match position {
                    Some(i) if state.source.contains(title) => {
                        state.articles.remove(i);
                        state.render_home();
                        Ok(())
                    }
                    _ => Err(ScenarioError::ElementLookup(format!(
                        "no delete control for {:?} on {}",
                        title, state.route
                    ))),
                }
            }
            other => Err(ScenarioError::ElementLookup(format!(
                "nothing clickable matches {:?}",
                other
            ))),
        }
    }

    async fn submit(&self, selector: &Selector) -> Result<(), ScenarioError> {
        let mut state = self.state.lock().unwrap();
        let sel_matches_form = matches!(
            selector,
            Selector::Tag(tag) if tag == "form"
        );
        if !sel_matches_form {
            return Err(ScenarioError::ElementLookup(format!(
                "submit expects the form tag, got {:?}",
                selector
            )));
        }
        if !state.source.contains("<form") {
            return Err(ScenarioError::ElementLookup(format!(
                "no form on {}",
                state.route
            )));
        }

        let route = state.route.clone();
        match route.as_str() {
            "/auth/signup" => {
                let name = state.form.get("fullName").cloned().unwrap_or_default();
                let email = state.form.get("email").cloned().unwrap_or_default();
                let password = state.form.get("password").cloned().unwrap_or_default();
                state.users.insert(email.clone(), (name, password));
                state.session_user = Some(email);
                state.render_home();
            }
            "/auth/login" => {
                let email = state.form.get("email").cloned().unwrap_or_default();
                let password = state.form.get("password").cloned().unwrap_or_default();
                let ok = state
                    .users
                    .get(&email)
                    .map(|(_, stored)| *stored == password)
                    .unwrap_or(false);
                if ok {
                    state.session_user = Some(email);
                    state.render_home();
                } else {
                    state.render_login(Some("Invalid email or password"));
                }
            }
            "/articles/new" => {
                let article = Article {
                    title: state.form.get("title").cloned().unwrap_or_default(),
                    description: state.form.get("description").cloned().unwrap_or_default(),
                    markdown: state.form.get("markdown").cloned().unwrap_or_default(),
                };
                state.articles.push(article);
                let index = state.articles.len() - 1;
                state.render_detail(index);
            }
            edit if edit.ends_with("/edit") => {
                let index = state.detail_index.ok_or_else(|| {
                    ScenarioError::ElementLookup(format!("no article bound to {}", edit))
                })?;
                state.articles[index] = Article {
                    title: state.form.get("title").cloned().unwrap_or_default(),
                    description: state.form.get("description").cloned().unwrap_or_default(),
                    markdown: state.form.get("markdown").cloned().unwrap_or_default(),
                };
                state.render_detail(index);
            }
            other => {
                return Err(ScenarioError::ElementLookup(format!(
                    "no form handler for {}",
                    other
                )))
            }
        }
        Ok(())
    }

    async fn page_source(&self) -> Result<String, ScenarioError> {
        Ok(self.state.lock().unwrap().source.clone())
    }

    async fn wait_for_text(&self, text: &str, timeout_ms: u64) -> Result<(), ScenarioError> {
        // State changes synchronously, so one check stands in for the poll.
        if self.state.lock().unwrap().source.contains(text) {
            Ok(())
        } else {
            Err(ScenarioError::Timeout {
                condition: format!("text {:?}", text),
                timeout_ms,
            })
        }
    }

    async fn wait_for_text_absent(
        &self,
        text: &str,
        timeout_ms: u64,
    ) -> Result<(), ScenarioError> {
        if !self.state.lock().unwrap().source.contains(text) {
            Ok(())
        } else {
            Err(ScenarioError::Timeout {
                condition: format!("absence of text {:?}", text),
                timeout_ms,
            })
        }
    }

    async fn close(&self) -> Result<(), ScenarioError> {
        self.state.lock().unwrap().closed += 1;
        Ok(())
    }
}
