//! Thin adapter over the blocking `ureq` transport.
//!
//! # Design
//! One fresh agent per round trip, so there is no connection reuse between
//! requests. `http_status_as_error(false)` makes ureq hand back 4xx/5xx
//! responses as ordinary data; that is how error bodies stay readable for
//! diagnostics instead of vanishing into a transport error. The gzip
//! feature of ureq is compiled out — `Accept-Encoding` and decompression
//! are owned by the executor, not the transport.

use crate::error::Error;
use crate::rest::Method;

/// Raw round-trip result before any body decoding.
pub(crate) struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ureq::Body,
}

/// Perform one round trip: connect, send headers (in the given order) and
/// body, return status + response headers + unread body.
pub(crate) fn execute(
    method: Method,
    url: &str,
    headers: &[(String, String)],
    body: Option<&[u8]>,
) -> Result<RawResponse, Error> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let response = match (method, body) {
        // A GET with a body is unusual but valid here: whether output is
        // enabled depends on the body alone, not the method.
        (Method::Get, Some(body)) => apply_headers(agent.get(url), headers)
            .force_send_body()
            .send(body)?,
        (Method::Get, None) => apply_headers(agent.get(url), headers).call()?,
        (Method::Put, Some(body)) => apply_headers(agent.put(url), headers).send(body)?,
        (Method::Put, None) => apply_headers(agent.put(url), headers).send_empty()?,
        (Method::Post, Some(body)) => apply_headers(agent.post(url), headers).send(body)?,
        (Method::Post, None) => apply_headers(agent.post(url), headers).send_empty()?,
    };

    let status = response.status().as_u16();
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
    let body = response.into_body();

    Ok(RawResponse {
        status,
        headers,
        body,
    })
}

fn apply_headers<Any>(
    mut builder: ureq::RequestBuilder<Any>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<Any> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// First value of `name` in a raw header list, case-insensitive on the name.
pub(crate) fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(header, _)| header.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Whether the executor should gunzip the body itself: it asked for gzip
/// and the server actually answered with `Content-Encoding: gzip`.
pub(crate) fn gunzip_active(requested: bool, content_encoding: Option<&str>) -> bool {
    requested && content_encoding.is_some_and(|enc| enc.eq_ignore_ascii_case("gzip"))
}
