//! Error types for the documentation recorder.
//!
//! # Design
//! Every failure of a recorded call comes back as a `RecorderError`; nothing
//! is retried or downgraded. Test code that wants the fail-fast behaviour
//! uses `Recorder::ask`, which turns the error into a panic at the call site.

/// Errors returned by `Recorder::execute` and the emitters.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// The request body could not be serialized to JSON.
    #[error("request body serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The method or path cannot form a valid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport error for {method} {url}: {message}")]
    Transport {
        method: String,
        url: String,
        message: String,
    },

    /// The response body could not be read in full.
    #[error("reading response body failed: {0}")]
    BodyRead(String),

    /// The descriptor pinned a status and the server answered another one.
    #[error("expected status {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    /// A documented response carried a body that is not JSON.
    #[error("response body for status {status} is not valid JSON: {source}")]
    ResponseNotJson {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Writing to the documentation sink failed.
    #[error("writing documentation failed: {0}")]
    Io(#[from] std::io::Error),
}
