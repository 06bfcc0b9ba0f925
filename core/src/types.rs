//! The request descriptor: what to call and how to document it.
//!
//! # Design
//! One structure carries every knob up front. Optional fields default to
//! "absent" (empty string, empty map, `None`), and an empty documentation
//! map means its block is left out of the rendered output. The maps are
//! `BTreeMap`s so rendering walks them in sorted order.

use std::collections::BTreeMap;

use crate::http::HttpMethod;

/// Username/password pair for HTTP Basic authentication.
///
/// The recorder always sends an `Authorization` header built from this pair,
/// so the empty pair is observably the same as "no auth configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicAuth {
    pub login: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

/// A declarative description of one recorded call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor<B = serde_json::Value> {
    pub method: HttpMethod,
    /// Logical path. Always used for the documentation heading.
    pub path: String,
    /// Path actually requested. Empty means `path`.
    pub request_path: String,
    /// Serialized to JSON and sent as the payload.
    pub body: Option<B>,
    /// Per-call headers. Sent only when the recorder applies request headers.
    pub request_headers: BTreeMap<String, String>,
    pub basic_auth: BasicAuth,
    pub description: String,
    /// Render a documentation block for this call.
    pub write: bool,
    pub response_codes: BTreeMap<u16, String>,
    pub response_fields: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    /// When set, any other response status fails the call.
    pub expect_status: Option<u16>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            request_path: String::new(),
            body: None,
            request_headers: BTreeMap::new(),
            basic_auth: BasicAuth::default(),
            description: String::new(),
            write: false,
            response_codes: BTreeMap::new(),
            response_fields: BTreeMap::new(),
            query_params: BTreeMap::new(),
            expect_status: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }
}

impl<B> RequestDescriptor<B> {
    /// Attach a payload, replacing any previous one.
    pub fn body<T>(self, body: T) -> RequestDescriptor<T> {
        RequestDescriptor {
            method: self.method,
            path: self.path,
            request_path: self.request_path,
            body: Some(body),
            request_headers: self.request_headers,
            basic_auth: self.basic_auth,
            description: self.description,
            write: self.write,
            response_codes: self.response_codes,
            response_fields: self.response_fields,
            query_params: self.query_params,
            expect_status: self.expect_status,
        }
    }

    pub fn request_path(mut self, path: impl Into<String>) -> Self {
        self.request_path = path.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.insert(name.into(), value.into());
        self
    }

    pub fn basic_auth(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = BasicAuth::new(login, password);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }

    pub fn response_code(mut self, code: u16, text: impl Into<String>) -> Self {
        self.response_codes.insert(code, text.into());
        self
    }

    pub fn response_field(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.response_fields.insert(name.into(), text.into());
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), text.into());
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expect_status = Some(status);
        self
    }

    /// The path actually requested: the override when set, else the logical path.
    pub fn effective_path(&self) -> &str {
        if self.request_path.is_empty() {
            &self.path
        } else {
            &self.request_path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn effective_path_defaults_to_logical_path() {
        let d = RequestDescriptor::get("/widgets/{id}");
        assert_eq!(d.effective_path(), "/widgets/{id}");
    }

    #[test]
    fn effective_path_uses_override() {
        let d = RequestDescriptor::get("/widgets/{id}").request_path("/widgets/1");
        assert_eq!(d.effective_path(), "/widgets/1");
        assert_eq!(d.path, "/widgets/{id}");
    }

    #[test]
    fn body_keeps_other_fields() {
        let d = RequestDescriptor::post("/widgets")
            .description("Create a widget")
            .write(true)
            .response_code(201, "Created")
            .body(json!({"name": "gear"}));
        assert_eq!(d.description, "Create a widget");
        assert!(d.write);
        assert_eq!(d.response_codes.get(&201).map(String::as_str), Some("Created"));
        assert_eq!(d.body, Some(json!({"name": "gear"})));
    }

    #[test]
    fn defaults_are_absent() {
        let d = RequestDescriptor::delete("/widgets/1");
        assert!(!d.write);
        assert!(d.body.is_none());
        assert_eq!(d.basic_auth, BasicAuth::default());
        assert!(d.response_codes.is_empty());
        assert!(d.expect_status.is_none());
    }
}
