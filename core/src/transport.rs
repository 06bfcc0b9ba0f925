//! The I/O seam between the recorder and the network.
//!
//! # Design
//! The recorder never talks to a socket itself: it builds an `HttpRequest`
//! and asks a `Transport` for the matching `HttpResponse`. Production tests
//! use `UreqTransport`; unit tests plug in canned responses. Calls are
//! blocking and carry no timeout of their own.

use crate::error::RecorderError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one request synchronously and returns the full response.
///
/// Non-2xx statuses are data, not errors. Implementations read the whole
/// body before returning, with no size cap.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RecorderError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RecorderError> {
        (**self).send(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use ureq::typestate::{WithBody, WithoutBody};
    use ureq::{Agent, RequestBuilder};

    use super::Transport;
    use crate::error::RecorderError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
    /// responses come back as `HttpResponse` values.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }

        /// Wrap an agent configured by the caller. It must not treat error
        /// statuses as transport failures.
        pub fn with_agent(agent: Agent) -> Self {
            Self { agent }
        }

        fn send_without_body(
            &self,
            builder: RequestBuilder<WithoutBody>,
            request: &HttpRequest,
        ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
            let builder = apply_headers(builder, request);
            match &request.body {
                Some(body) => builder.force_send_body().send(body.as_bytes()),
                None => builder.call(),
            }
        }

        fn send_with_body(
            &self,
            builder: RequestBuilder<WithBody>,
            request: &HttpRequest,
        ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
            let builder = apply_headers(builder, request);
            match &request.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RecorderError> {
            let url = request.url.as_str();
            let result = match request.method {
                HttpMethod::Get => self.send_without_body(self.agent.get(url), request),
                HttpMethod::Head => self.send_without_body(self.agent.head(url), request),
                HttpMethod::Delete => self.send_without_body(self.agent.delete(url), request),
                HttpMethod::Options => self.send_without_body(self.agent.options(url), request),
                HttpMethod::Post => self.send_with_body(self.agent.post(url), request),
                HttpMethod::Put => self.send_with_body(self.agent.put(url), request),
                HttpMethod::Patch => self.send_with_body(self.agent.patch(url), request),
            };

            let mut response = result.map_err(|e| RecorderError::Transport {
                method: request.method.to_string(),
                url: request.url.clone(),
                message: e.to_string(),
            })?;

            let status = response.status().as_u16();
            let version = format!("{:?}", response.version());
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .read_to_vec()
                .map_err(|e| RecorderError::BodyRead(e.to_string()))?;

            Ok(HttpResponse {
                version,
                status,
                headers,
                body,
            })
        }
    }

    fn apply_headers<S>(mut builder: RequestBuilder<S>, request: &HttpRequest) -> RequestBuilder<S> {
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }
}
