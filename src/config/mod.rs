use serde::{Deserialize, Serialize};
use tracing::Level;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Runtime configuration injected by the hosting page as `window.ENV`.
///
/// ```html
/// <script>window.ENV = { API_URL: "https://notes.example.com/api", LOG_LEVEL: "debug" };</script>
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub log_level: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::from_lookup(read_window_env)
    }

    /// Builds the config from any key lookup. `API_URL` wins over the legacy `api_url`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_empty("API_URL")
            .or_else(|| non_empty("api_url"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let log_level = non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Self { api_url, log_level }
    }

    /// Unknown level names fall back to `INFO`.
    pub fn level(&self) -> Level {
        self.log_level.trim().parse().unwrap_or(Level::INFO)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_window_env(key: &str) -> Option<String> {
    let window = web_sys::window()?;
    let env = window.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    js_sys::Reflect::get(&env, &key.into())
        .ok()
        .and_then(|v| v.as_string())
}
