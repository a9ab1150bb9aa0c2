//! Minimal fluent blocking REST client.
//!
//! # Overview
//! Builds a request through chained calls (method, URL, query parameters,
//! headers, body), executes it synchronously over one fresh connection, and
//! decodes the response into raw bytes, text, or a parsed JSON value
//! depending on which terminal method was called.
//!
//! # Design
//! - [`Rest`] is an explicit, cloneable context holding the default
//!   User-Agent and the debug level — no process-wide mutable state.
//! - [`RestRequest`] is a consuming builder; every setter takes `self`, so a
//!   request that has been executed cannot alias a live builder.
//! - The three terminal methods share one round trip and differ only in
//!   Accept defaults, body decoding, and how a non-2xx status is reported.
//! - Non-2xx bodies are still read (the transport is configured to hand
//!   error statuses back as data), so [`Error::Http`] can carry the server's
//!   diagnostic body.
//! - On `https` URLs the client advertises `Accept-Encoding: gzip` and
//!   gunzips the body itself when the server honors the hint.
//!
//! # Example
//! ```no_run
//! use rest_core::Rest;
//!
//! # fn main() -> Result<(), rest_core::Error> {
//! let rest = Rest::new();
//! let response = rest
//!     .get("https://api.example.com/search")?
//!     .param("q", "rust")
//!     .basic_auth("user", "secret")
//!     .as_json()?;
//! println!("{} -> {}", response.status(), response.body());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod rest;
mod transport;

pub use error::Error;
pub use request::RestRequest;
pub use response::{BytesResponse, JsonResponse, Response, TextResponse};
pub use rest::{DebugLevel, Method, Rest};
