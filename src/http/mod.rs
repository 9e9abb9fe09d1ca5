//! HTTP transport module
//!
//! Executes single requests against the API and classifies the outcome.
//!
//! # Features
//!
//! - **Two modes**: async `HttpClient` and blocking `BlockingHttpClient`
//! - **Basic auth**: credentials applied to every request
//! - **Error classification**: statuses and bodies mapped to typed errors
//!   before any JSON decoding

mod blocking;
mod client;
mod response;

pub use blocking::BlockingHttpClient;
pub use client::{HttpClient, RequestConfig};
pub use response::{check_status, decode_body, excerpt, parse_response, BODY_EXCERPT_CHARS};

#[cfg(test)]
mod tests;
