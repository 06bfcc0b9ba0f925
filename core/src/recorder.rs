//! The documentation recorder: execute a described call, optionally render it.
//!
//! # Design
//! `Recorder` borrows the output sink for its whole lifetime and never
//! closes it; the caller owns the sink and decides when it is done. Each
//! call is split into `build_request` (pure), a blocking `Transport::send`,
//! and `render_exchange`. The rendered block is buffered and written with a
//! single `write_all`, so a call that fails while rendering leaves the sink
//! exactly as it was.
//!
//! A recorder is not meant to be shared across threads; calls on one
//! instance are serialized by the `&mut self` receivers.

use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::RecorderConfig;
use crate::error::RecorderError;
use crate::http::{HttpRequest, HttpResponse};
use crate::render::{render_exchange, write_heading, write_paragraph};
use crate::transport::Transport;
use crate::types::{BasicAuth, RequestDescriptor};

/// One request as sent and the response it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub request: HttpRequest,
    pub response: HttpResponse,
}

impl Exchange {
    /// Deserialize the response body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.response.body)
    }
}

/// Executes `RequestDescriptor`s against a test endpoint and appends their
/// documentation to a borrowed sink.
#[cfg(feature = "ureq")]
pub struct Recorder<'w, W: Write + ?Sized, T = crate::transport::UreqTransport> {
    sink: &'w mut W,
    config: RecorderConfig,
    transport: T,
}

#[cfg(not(feature = "ureq"))]
pub struct Recorder<'w, W: Write + ?Sized, T> {
    sink: &'w mut W,
    config: RecorderConfig,
    transport: T,
}

#[cfg(feature = "ureq")]
impl<'w, W: Write + ?Sized> Recorder<'w, W> {
    pub fn new(sink: &'w mut W, config: RecorderConfig) -> Self {
        Self::with_transport(sink, config, crate::transport::UreqTransport::new())
    }
}

impl<'w, W: Write + ?Sized, T: Transport> Recorder<'w, W, T> {
    pub fn with_transport(sink: &'w mut W, config: RecorderConfig, transport: T) -> Self {
        Self {
            sink,
            config,
            transport,
        }
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Run the call and, when `descriptor.write` is set, document it.
    pub fn execute<B: Serialize>(
        &mut self,
        descriptor: &RequestDescriptor<B>,
    ) -> Result<Exchange, RecorderError> {
        let request = build_request(&self.config, descriptor)?;
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.send(&request)?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            body_len = response.body.len(),
            "received response"
        );

        if let Some(expected) = descriptor.expect_status {
            if response.status != expected {
                tracing::warn!(expected, actual = response.status, url = %request.url, "unexpected status");
                return Err(RecorderError::UnexpectedStatus {
                    expected,
                    actual: response.status,
                });
            }
        }

        if descriptor.write {
            let mut block = Vec::new();
            render_exchange(&mut block, descriptor, &request, &response, self.config.sort_headers)?;
            self.sink.write_all(&block)?;
            tracing::trace!(path = %descriptor.path, bytes = block.len(), "documentation block written");
        }

        Ok(Exchange { request, response })
    }

    /// `execute` for test code: any error fails the calling test.
    #[track_caller]
    pub fn ask<B: Serialize>(&mut self, descriptor: &RequestDescriptor<B>) -> Exchange {
        match self.execute(descriptor) {
            Ok(exchange) => exchange,
            Err(err) => panic!("{} {}: {err}", descriptor.method, descriptor.path),
        }
    }

    /// Emit a section heading underlined with `underline`.
    pub fn head(&mut self, title: &str, underline: char) -> Result<(), RecorderError> {
        write_heading(&mut *self.sink, title, underline)
    }

    /// Emit a paragraph of plain text.
    pub fn says(&mut self, text: &str) -> Result<(), RecorderError> {
        write_paragraph(&mut *self.sink, text)
    }

    /// Flush the sink. Closing it stays with the owner.
    pub fn finish(self) -> Result<(), RecorderError> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Build the request a descriptor describes, without sending it.
///
/// Header order: config defaults, then per-call headers when
/// `apply_request_headers` is on (replacing defaults by name), then
/// `Authorization`.
pub fn build_request<B: Serialize>(
    config: &RecorderConfig,
    descriptor: &RequestDescriptor<B>,
) -> Result<HttpRequest, RecorderError> {
    let body = descriptor
        .body
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(RecorderError::Serialization)?;

    let target = descriptor.effective_path();
    if !target.starts_with('/') {
        return Err(RecorderError::InvalidRequest(format!("path {target:?} must start with '/'")));
    }
    if target.chars().any(char::is_whitespace) {
        return Err(RecorderError::InvalidRequest(format!("path {target:?} contains whitespace")));
    }
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let mut headers: Vec<(String, String)> = config
        .default_headers
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if config.apply_request_headers {
        for (name, value) in &descriptor.request_headers {
            set_header(&mut headers, name, value);
        }
    }
    set_header(&mut headers, "Authorization", &basic_auth_value(&descriptor.basic_auth));
    for (name, value) in &headers {
        validate_header(name, value)?;
    }

    Ok(HttpRequest {
        method: descriptor.method,
        url: format!("{}{target}", config.base_url),
        path: path.to_string(),
        query: query.to_string(),
        headers,
        body,
    })
}

fn basic_auth_value(auth: &BasicAuth) -> String {
    let credentials = format!("{}:{}", auth.login, auth.password);
    format!("Basic {}", BASE64_STANDARD.encode(credentials))
}

/// Names must be RFC 7230 tokens; values must not contain CR, LF or NUL.
fn validate_header(name: &str, value: &str) -> Result<(), RecorderError> {
    let is_tchar = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c);
    if name.is_empty() || !name.chars().all(is_tchar) {
        return Err(RecorderError::InvalidRequest(format!("invalid header name {name:?}")));
    }
    if value.chars().any(|c| matches!(c, '\r' | '\n' | '\0')) {
        return Err(RecorderError::InvalidRequest(format!("invalid value for header {name:?}")));
    }
    Ok(())
}

/// Replace the first header named `name` (any case), or append it.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(slot) => *slot = (name.to_string(), value.to_string()),
        None => headers.push((name.to_string(), value.to_string())),
    }
}
