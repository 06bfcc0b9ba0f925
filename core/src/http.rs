//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The recorder builds an
//! `HttpRequest` from a descriptor, hands it to a `Transport`, and renders
//! whatever `HttpResponse` comes back. Headers are kept as ordered pairs so
//! the rendered documentation shows them in send/receive order.

use std::fmt;
use std::str::FromStr;

use crate::error::RecorderError;

/// Protocol version printed on the example request line.
pub const REQUEST_VERSION: &str = "HTTP/1.1";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RecorderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(RecorderError::InvalidRequest(format!("unsupported method {s:?}"))),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is what the transport dials; `path` and `query` are what the
/// example request line shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub path: String,
    /// Raw query string without the leading `?`; empty when absent.
    pub query: String,
    pub headers: Vec<(String, String)>,
    /// Compact JSON payload.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub version: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// `HTTP/1.1 200 OK`, or just the code when it has no canonical reason.
    pub fn status_line(&self) -> String {
        match reason_phrase(self.status) {
            Some(reason) => format!("{} {} {reason}", self.version, self.status),
            None => format!("{} {}", self.version, self.status),
        }
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn reason_phrase(status: u16) -> Option<&'static str> {
    let reason = match status {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        409 => "Conflict",
        410 => "Gone",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return None,
    };
    Some(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_any_case() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
    }

    #[test]
    fn unknown_method_is_invalid_request() {
        let err = "BREW".parse::<HttpMethod>().unwrap_err();
        assert!(matches!(err, RecorderError::InvalidRequest(_)));
    }

    #[test]
    fn status_line_uses_reason_phrase() {
        let response = HttpResponse {
            version: "HTTP/1.1".to_string(),
            status: 404,
            headers: Vec::new(),
            body: Vec::new(),
        };
        assert_eq!(response.status_line(), "HTTP/1.1 404 Not Found");
    }

    #[test]
    fn status_line_without_reason() {
        let response = HttpResponse {
            version: "HTTP/1.1".to_string(),
            status: 599,
            headers: Vec::new(),
            body: Vec::new(),
        };
        assert_eq!(response.status_line(), "HTTP/1.1 599");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            version: "HTTP/1.1".to_string(),
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Vec::new(),
        };
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }
}
