//! Fluent request builder and executor.
//!
//! # Design
//! A [`RestRequest`] accumulates configuration through chained calls and is
//! consumed by one of the terminal methods ([`as_bytes`], [`as_text`],
//! [`as_utf8`], [`as_json`]). Each terminal applies its Accept defaults,
//! drives one round trip through the transport adapter, decodes the body,
//! and — unless [`allow_error_status`] was called — turns a non-2xx status
//! into [`Error::Http`] carrying the decoded body as context.
//!
//! The query string is kept as a pre-encoded accumulator seeded from the
//! URL's own query, so parameter order is exactly call order and the final
//! URL is reassembled as `scheme://host[:port]path?query`.
//!
//! [`as_bytes`]: RestRequest::as_bytes
//! [`as_text`]: RestRequest::as_text
//! [`as_utf8`]: RestRequest::as_utf8
//! [`as_json`]: RestRequest::as_json
//! [`allow_error_status`]: RestRequest::allow_error_status

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::response::{decode_text, read_whole_stream, BytesResponse, JsonResponse, Response, TextResponse};
use crate::rest::{DebugLevel, Method, Rest};
use crate::transport;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Query-component encode set: everything except alphanumerics and
/// `_ - ! . ~ ' ( ) *` is percent-escaped, space included.
const QUERY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'-')
    .remove(b'!')
    .remove(b'.')
    .remove(b'~')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*');

/// One HTTP request under construction. Created via [`Rest::get`]/`put`/`post`.
///
/// Builder methods consume and return the request, so configuration chains
/// naturally and an executed request cannot be reused by accident.
#[derive(Debug, Clone)]
pub struct RestRequest {
    rest: Rest,
    method: Method,
    url: Url,
    query: String,
    authorization: Option<String>,
    body: Option<Vec<u8>>,
    content_type: Option<String>,
    accept: Option<String>,
    accept_charset: Option<String>,
    user_agent: Option<String>,
    extra_headers: Vec<(String, String)>,
    error_on_status: bool,
}

impl RestRequest {
    pub(crate) fn new(method: Method, url: &str, rest: Rest) -> Result<Self, Error> {
        let url = Url::parse(url)?;
        // Schemes the transport cannot speak fail fast, like a bad URL.
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::UnsupportedScheme(url.scheme().to_string()));
        }
        let query = match url.query() {
            Some(q) if !q.is_empty() => format!("?{q}"),
            _ => String::new(),
        };
        Ok(Self {
            rest,
            method,
            url,
            query,
            authorization: None,
            body: None,
            content_type: None,
            accept: None,
            accept_charset: None,
            user_agent: None,
            extra_headers: Vec::new(),
            error_on_status: true,
        })
    }

    /// Send `Authorization: Basic base64(user:password)`.
    pub fn basic_auth(mut self, user: &str, password: &str) -> Self {
        self.authorization = Some(STANDARD.encode(format!("{user}:{password}")));
        self
    }

    /// Append a query parameter. Name and value are percent-encoded; the
    /// pair is joined to the accumulator with `&`, or `?` if it is the
    /// first one.
    pub fn param(mut self, name: &str, value: &str) -> Self {
        let encoded = format!(
            "{}={}",
            utf8_percent_encode(name, QUERY_ENCODE),
            utf8_percent_encode(value, QUERY_ENCODE)
        );
        if self.query.is_empty() {
            self.query.push('?');
        } else {
            self.query.push('&');
        }
        self.query.push_str(&encoded);
        self
    }

    /// Like [`param`](Self::param), but a no-op when `value` is `None`.
    pub fn param_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Serialize `value` as the JSON request body and set the content type
    /// to `application/json`.
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self, Error> {
        self.body = Some(serde_json::to_vec(value)?);
        self.content_type = Some(JSON_CONTENT_TYPE.to_string());
        Ok(self)
    }

    /// Set an explicit `Accept` header, overriding the terminal method's
    /// default.
    pub fn accept(mut self, value: impl Into<String>) -> Self {
        self.accept = Some(value.into());
        self
    }

    /// Set an explicit `Accept-Charset` header, overriding the terminal
    /// method's default.
    pub fn accept_charset(mut self, value: impl Into<String>) -> Self {
        self.accept_charset = Some(value.into());
        self
    }

    /// Add an arbitrary header. Extra headers are sent after the fixed set,
    /// in call order.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Override the User-Agent for this request only.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.user_agent = Some(value.into());
        self
    }

    /// Return non-2xx responses as values instead of [`Error::Http`], so the
    /// caller can inspect `status` itself.
    pub fn allow_error_status(mut self) -> Self {
        self.error_on_status = false;
        self
    }

    /// Execute and return the raw body bytes.
    ///
    /// Accept defaults to `*/*`. On a non-2xx status the error carries no
    /// body context — raw bytes are not stringified.
    pub fn as_bytes(mut self) -> Result<BytesResponse, Error> {
        if self.accept.is_none() {
            self.accept = Some("*/*".to_string());
        }
        let (status, bytes) = self.send()?;
        if self.rest.debug_level() >= DebugLevel::Trace {
            log::trace!("byte response: {} bytes", bytes.len());
        }
        if self.error_on_status && status / 100 != 2 {
            return Err(Error::Http { status, body: None });
        }
        Ok(Response::new(status, bytes))
    }

    /// Execute and decode the body as text in the given encoding.
    ///
    /// Accept defaults to `*/*`, Accept-Charset to `encoding`. Fails with
    /// [`Error::UnsupportedEncoding`] for labels this crate cannot decode.
    pub fn as_text(mut self, encoding: &str) -> Result<TextResponse, Error> {
        if self.accept.is_none() {
            self.accept = Some("*/*".to_string());
        }
        if self.accept_charset.is_none() {
            self.accept_charset = Some(encoding.to_string());
        }
        let (status, bytes) = self.send()?;
        let text = decode_text(&bytes, encoding)?;
        if self.rest.debug_level() >= DebugLevel::Trace {
            log::trace!("text response: {text}");
        }
        if self.error_on_status && status / 100 != 2 {
            return Err(Error::Http {
                status,
                body: Some(text),
            });
        }
        Ok(Response::new(status, text))
    }

    /// Execute and decode the body as UTF-8 text.
    pub fn as_utf8(self) -> Result<TextResponse, Error> {
        self.as_text("utf-8")
    }

    /// Execute and parse the body as a JSON value.
    ///
    /// Accept defaults to `application/json` and Accept-Charset to `UTF-8`.
    /// A body that is not valid JSON fails with [`Error::Json`] even on a
    /// non-2xx status.
    pub fn as_json(mut self) -> Result<JsonResponse, Error> {
        if self.accept.is_none() {
            self.accept = Some(JSON_CONTENT_TYPE.to_string());
        }
        if self.accept_charset.is_none() {
            self.accept_charset = Some("UTF-8".to_string());
        }
        let (status, bytes) = self.send()?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        if self.rest.debug_level() >= DebugLevel::Trace {
            log::trace!("JSON response: {value}");
        }
        if self.error_on_status && status / 100 != 2 {
            return Err(Error::Http {
                status,
                body: Some(value.to_string()),
            });
        }
        Ok(Response::new(status, value))
    }

    /// One blocking round trip: reassemble the URL, send the ordered header
    /// plan and body, read the whole response body (gunzipping when the
    /// server honored the gzip hint on a secure scheme).
    fn send(&self) -> Result<(u16, Vec<u8>), Error> {
        let url = self.final_url();
        let secure = self.url.scheme().eq_ignore_ascii_case("https");
        let headers = self.header_plan(secure);
        let debug = self.rest.debug_level();

        if debug >= DebugLevel::Trace {
            log::trace!("URL: {url}");
            for (name, value) in &headers {
                log::trace!("request header: {name}: {value}");
            }
            if let (Some(body), Some(content_type)) = (&self.body, &self.content_type) {
                if content_type.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
                    log::trace!("request body: {}", String::from_utf8_lossy(body));
                }
            }
        }

        let raw = transport::execute(self.method, &url, &headers, self.body.as_deref())?;
        let status = raw.status;

        if debug >= DebugLevel::Trace {
            log::trace!("response: {status} for {url}");
            for (name, value) in &raw.headers {
                log::trace!("response header: {name}: {value}");
            }
        } else if debug >= DebugLevel::Log && status / 100 != 2 {
            log::debug!("response: {status} for {url}");
        }

        let reader = raw.body.into_with_config().limit(u64::MAX).reader();
        let bytes = read_body(secure, &raw.headers, reader)?;
        Ok((status, bytes))
    }

    /// `scheme://host[:port]path?query`, path defaulting to `/`.
    fn final_url(&self) -> String {
        let mut out = String::with_capacity(256);
        out.push_str(self.url.scheme());
        out.push_str("://");
        out.push_str(self.url.host_str().unwrap_or(""));
        if let Some(port) = self.url.port() {
            out.push(':');
            out.push_str(&port.to_string());
        }
        let path = self.url.path();
        out.push_str(if path.is_empty() { "/" } else { path });
        out.push_str(&self.query);
        out
    }

    /// Outgoing headers in their fixed order: Authorization, Content-Type,
    /// Accept, Accept-Charset, Content-Length (bodiless requests only — the
    /// transport derives it from the byte slice otherwise), User-Agent,
    /// Accept-Encoding (secure schemes), then extra headers in call order.
    fn header_plan(&self, secure: bool) -> Vec<(String, String)> {
        let mut plan = Vec::new();
        if let Some(token) = &self.authorization {
            plan.push(("Authorization".to_string(), format!("Basic {token}")));
        }
        if let Some(content_type) = &self.content_type {
            plan.push(("Content-Type".to_string(), content_type.clone()));
        }
        if let Some(accept) = &self.accept {
            plan.push(("Accept".to_string(), accept.clone()));
        }
        if let Some(charset) = &self.accept_charset {
            plan.push(("Accept-Charset".to_string(), charset.clone()));
        }
        if self.body.is_none() {
            plan.push(("Content-Length".to_string(), "0".to_string()));
        }
        let user_agent = self
            .user_agent
            .as_deref()
            .or_else(|| self.rest.default_user_agent());
        if let Some(user_agent) = user_agent {
            plan.push(("User-Agent".to_string(), user_agent.to_string()));
        }
        if secure {
            plan.push(("Accept-Encoding".to_string(), "gzip".to_string()));
        }
        plan.extend(self.extra_headers.iter().cloned());
        plan
    }
}

/// Read the whole response body, gunzipping it when compression was
/// requested (secure scheme) and the response headers say the server
/// honored the hint. An ignored hint means the body is plain and is read
/// as-is.
fn read_body<R: std::io::Read>(
    gzip_requested: bool,
    response_headers: &[(String, String)],
    reader: R,
) -> Result<Vec<u8>, Error> {
    let encoding = transport::header_value(response_headers, "content-encoding");
    if transport::gunzip_active(gzip_requested, encoding) {
        Ok(read_whole_stream(GzDecoder::new(reader))?)
    } else {
        Ok(read_whole_stream(reader)?)
    }
}
