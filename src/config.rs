//! API Configuration
//!
//! Resolves the backend base URL and builds endpoint URLs from it.

/// Name of the `<meta>` tag the host page can use to point at another backend
pub const META_API_URL: &str = "todo-api-url";

/// Fallback when neither the page nor the build provides a URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Backend location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim().trim_end_matches('/').to_string(),
        }
    }

    /// Page meta tag, then `TODO_API_URL` at build time, then the default
    pub fn resolve() -> Self {
        let from_page = meta_content(META_API_URL);
        let config = Self::new(pick_base_url(from_page.as_deref(), option_env!("TODO_API_URL")));
        tracing::info!(base_url = %config.base_url(), "resolved API base URL");
        config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection endpoint; doubles as the cache key
    pub fn list_url(&self) -> String {
        format!("{}/allTodos", self.base_url)
    }

    pub fn create_url(&self) -> String {
        format!("{}/createTodos", self.base_url)
    }

    pub fn edit_url(&self, id: &str) -> String {
        format!("{}/editTodos/{}", self.base_url, id)
    }

    pub fn delete_url(&self, id: &str) -> String {
        format!("{}/deleteTodos/{}", self.base_url, id)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn pick_base_url<'a>(from_page: Option<&'a str>, from_build: Option<&'a str>) -> &'a str {
    [from_page, from_build]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL)
}

fn meta_content(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let selector = format!(r#"meta[name="{}"]"#, name);
    document
        .query_selector(&selector)
        .ok()
        .flatten()?
        .get_attribute("content")
}
