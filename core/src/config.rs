//! Recorder configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Settings shared by every call made through one `Recorder`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Base URL of the test endpoint, without a trailing slash.
    pub base_url: String,

    /// Headers set on every request, before anything else.
    pub default_headers: BTreeMap<String, String>,

    /// Send each descriptor's `request_headers`, replacing defaults with the
    /// same name. Off by default: per-call headers are documentation only.
    pub apply_request_headers: bool,

    /// Render header lines sorted by lower-cased name instead of in
    /// send/receive order.
    pub sort_headers: bool,
}

impl RecorderConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Config whose only default header is `Content-Type`.
    pub fn with_content_type(base_url: &str, content_type: &str) -> Self {
        Self::new(base_url).default_header("Content-Type", content_type)
    }

    /// Load a config from a JSON document; missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn apply_request_headers(mut self, apply: bool) -> Self {
        self.apply_request_headers = apply;
        self
    }

    pub fn sort_headers(mut self, sort: bool) -> Self {
        self.sort_headers = sort;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(RecorderConfig::new("http://localhost:3000/").base_url, "http://localhost:3000");
    }

    #[test]
    fn content_type_shorthand() {
        let config = RecorderConfig::with_content_type("http://localhost:3000", "application/json");
        assert_eq!(
            config.default_headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert!(!config.apply_request_headers);
        assert!(!config.sort_headers);
    }

    #[test]
    fn from_json_fills_defaults() {
        let config = RecorderConfig::from_json_str(
            r#"{"base_url":"http://127.0.0.1:8080/","default_headers":{"Accept":"application/json"}}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.default_headers.len(), 1);
        assert!(!config.sort_headers);
    }
}
