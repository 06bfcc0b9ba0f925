//! Record HTTP API calls made by a test suite as reStructuredText docs.
//!
//! # Overview
//! A test describes a call with a `RequestDescriptor`, hands it to a
//! `Recorder`, and the recorder sends it to the test server and, when asked,
//! appends a documentation block (heading, description, response codes,
//! query parameters, response fields, example request and response) to the
//! sink it borrows.
//!
//! # Design
//! - Building the request and rendering the exchange are pure; the network
//!   round-trip goes through the `Transport` trait (host-does-IO pattern).
//!   `UreqTransport` is the blocking implementation behind the default
//!   `ureq` feature.
//! - Every failure is a returned `RecorderError`. `Recorder::ask` is the
//!   fail-fast variant for test bodies.
//! - Documentation maps are `BTreeMap`s, so codes and names always render
//!   in sorted order.

pub mod config;
pub mod error;
pub mod http;
pub mod recorder;
pub mod render;
pub mod transport;
pub mod types;

pub use config::RecorderConfig;
pub use error::RecorderError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use recorder::{build_request, Exchange, Recorder};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{BasicAuth, RequestDescriptor};
