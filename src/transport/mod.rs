//! HTTP transport for VO service requests.
//!
//! The [`HttpClient`] trait is the seam between protocol logic and the wire:
//! production code uses [`ReqwestClient`], tests inject mocks. One request is
//! described by a [`Request`] value; [`invoke`] runs it with per-attempt
//! timeouts and bounded retries.

mod http;
mod invoke;
mod types;

pub use http::{HttpClient, ReqwestClient};
pub use invoke::invoke;
pub use types::{Request, TransportError};

#[cfg(test)]
pub use http::tests::MockHttpClient;
