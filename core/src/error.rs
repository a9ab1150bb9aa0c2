//! Error types for the REST client.
//!
//! # Design
//! One flat enum for the whole pipeline. `Http` is special: it is only
//! returned while error-on-status is enabled (the default) and carries the
//! decoded response body when the terminal method produced one, so callers
//! get the server's diagnostic text without a second request.

use thiserror::Error;

/// Errors returned by request building and the terminal methods.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL handed to [`Rest::get`]/`put`/`post` did not parse.
    ///
    /// [`Rest::get`]: crate::Rest::get
    #[error("malformed URL: {0}")]
    MalformedUrl(#[from] url::ParseError),

    /// The URL parsed but its scheme is not `http` or `https`, so this
    /// client cannot reach it.
    #[error("unsupported URL scheme: {0:?}")]
    UnsupportedScheme(String),

    /// The transport failed before or during the round trip (connection
    /// refused, TLS failure, protocol error).
    #[error("transport failure: {0}")]
    Transport(#[from] ureq::Error),

    /// Reading the response body failed mid-stream.
    #[error("failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered with a non-2xx status. `body` holds the decoded
    /// response body when the terminal method decodes one (`as_text`,
    /// `as_json`); `as_bytes` leaves it `None` rather than stringify raw
    /// bytes.
    #[error("HTTP {status}{}", body_suffix(.body))]
    Http { status: u16, body: Option<String> },

    /// `as_text` was asked for a character encoding this crate cannot decode.
    #[error("unsupported text encoding: {0:?}")]
    UnsupportedEncoding(String),

    /// A request body failed to serialize, or a response body was not valid
    /// JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(": {body}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_without_body_shows_status_only() {
        let err = Error::Http {
            status: 404,
            body: None,
        };
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn http_error_with_body_appends_context() {
        let err = Error::Http {
            status: 503,
            body: Some("try later".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP 503: try later");
    }

    #[test]
    fn unsupported_encoding_names_the_label() {
        let err = Error::UnsupportedEncoding("utf-16".to_string());
        assert_eq!(err.to_string(), "unsupported text encoding: \"utf-16\"");
    }
}
