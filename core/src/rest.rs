//! Client context and request entry points.
//!
//! # Design
//! The default User-Agent and the debug level live in an explicit [`Rest`]
//! value that each request snapshots at creation time, not in process-wide
//! statics: cloning is cheap, tests stay hermetic, and cross-thread sharing
//! is the caller's choice rather than an ambient race.

use crate::error::Error;
use crate::request::RestRequest;

const DEFAULT_USER_AGENT: &str = concat!("rest-core/", env!("CARGO_PKG_VERSION"));

/// HTTP method for a request. Only the verbs this client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
        }
    }
}

/// How chatty the client is on the `log` facade.
///
/// `Log` reports non-2xx responses at debug level. `Trace` additionally
/// dumps the final URL, every request/response header, and body summaries
/// at trace level. The embedding process still controls the sink and its
/// filter; this level only gates what the client emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    #[default]
    Off,
    Log,
    Trace,
}

/// Client context: the defaults shared by every request created from it.
#[derive(Debug, Clone)]
pub struct Rest {
    user_agent: Option<String>,
    debug: DebugLevel,
}

impl Default for Rest {
    fn default() -> Self {
        Self {
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            debug: DebugLevel::Off,
        }
    }
}

impl Rest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default User-Agent sent with every request. Individual
    /// requests may still override it via [`RestRequest::user_agent`].
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.user_agent = Some(value.into());
        self
    }

    /// Set the debug level for requests created from this context.
    pub fn debug(mut self, level: DebugLevel) -> Self {
        self.debug = level;
        self
    }

    /// Start a GET request. Fails if `url` is not a well-formed URL.
    pub fn get(&self, url: &str) -> Result<RestRequest, Error> {
        RestRequest::new(Method::Get, url, self.clone())
    }

    /// Start a PUT request. Fails if `url` is not a well-formed URL.
    pub fn put(&self, url: &str) -> Result<RestRequest, Error> {
        RestRequest::new(Method::Put, url, self.clone())
    }

    /// Start a POST request. Fails if `url` is not a well-formed URL.
    pub fn post(&self, url: &str) -> Result<RestRequest, Error> {
        RestRequest::new(Method::Post, url, self.clone())
    }

    pub(crate) fn default_user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub(crate) fn debug_level(&self) -> DebugLevel {
        self.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_has_crate_user_agent() {
        let rest = Rest::new();
        let ua = rest.default_user_agent().unwrap();
        assert!(ua.starts_with("rest-core/"), "unexpected agent: {ua}");
    }

    #[test]
    fn user_agent_is_replaceable() {
        let rest = Rest::new().user_agent("probe/2.1");
        assert_eq!(rest.default_user_agent(), Some("probe/2.1"));
    }

    #[test]
    fn debug_levels_are_ordered() {
        assert!(DebugLevel::Off < DebugLevel::Log);
        assert!(DebugLevel::Log < DebugLevel::Trace);
        assert_eq!(DebugLevel::default(), DebugLevel::Off);
    }

    #[test]
    fn malformed_url_fails_at_creation() {
        let err = Rest::new().get("not a url").unwrap_err();
        assert!(matches!(err, Error::MalformedUrl(_)));
    }

    #[test]
    fn non_http_scheme_fails_at_creation() {
        let err = Rest::new().get("mailto:x@example.com").unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(scheme) if scheme == "mailto"));

        let err = Rest::new().post("ftp://example.com/upload").unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(scheme) if scheme == "ftp"));
    }

    #[test]
    fn method_wire_strings() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Put.as_str(), "PUT");
        assert_eq!(Method::Post.as_str(), "POST");
    }
}
