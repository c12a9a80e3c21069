//! Portal REST API client.
//!
//! [`ApiClient`] decorates every request with the JSON content type and,
//! when the session holds a token, a bearer `Authorization` header. Typed
//! wrappers for each endpoint live in [`endpoints`].

mod client;
pub mod endpoints;
mod types;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

pub use client::{failure_message, ApiClient, RequestOptions, GENERIC_FAILURE_MESSAGE};
pub use types::*;
