//! Typed responses and body decoding.
//!
//! # Design
//! The three response shapes share one generic struct instead of a subclass
//! hierarchy: the status field and success test are common, the payload type
//! is the only variation. Values are created by the executor after the round
//! trip and carry no mutators.

use std::io::{self, ErrorKind, Read};

use crate::error::Error;

/// A decoded response: the HTTP status plus the variant payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    status: u16,
    body: T,
}

/// Response decoded as raw bytes.
pub type BytesResponse = Response<Vec<u8>>;
/// Response decoded as text in the requested encoding.
pub type TextResponse = Response<String>;
/// Response parsed as a JSON value.
pub type JsonResponse = Response<serde_json::Value>;

impl<T> Response<T> {
    pub(crate) fn new(status: u16, body: T) -> Self {
        Self { status, body }
    }

    /// The numeric HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx class.
    pub fn is_success(&self) -> bool {
        self.status / 100 == 2
    }

    pub fn body(&self) -> &T {
        &self.body
    }

    pub fn into_body(self) -> T {
        self.body
    }
}

/// Decode `bytes` using a named character encoding.
///
/// Supported labels (case-insensitive): `utf-8`/`utf8`, `us-ascii`/`ascii`,
/// `iso-8859-1`/`latin-1`/`latin1`. Invalid bytes decode to the replacement
/// character rather than failing; only an unknown label is an error.
pub(crate) fn decode_text(bytes: &[u8], encoding: &str) -> Result<String, Error> {
    if encoding.eq_ignore_ascii_case("utf-8") || encoding.eq_ignore_ascii_case("utf8") {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }
    if encoding.eq_ignore_ascii_case("us-ascii") || encoding.eq_ignore_ascii_case("ascii") {
        return Ok(bytes
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
            .collect());
    }
    if encoding.eq_ignore_ascii_case("iso-8859-1")
        || encoding.eq_ignore_ascii_case("latin-1")
        || encoding.eq_ignore_ascii_case("latin1")
    {
        // Latin-1 maps byte values directly to the first 256 code points.
        return Ok(bytes.iter().map(|&b| b as char).collect());
    }
    Err(Error::UnsupportedEncoding(encoding.to_string()))
}

/// Read `reader` to exhaustion in fixed 8 KiB chunks, no size limit.
pub(crate) fn read_whole_stream<R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buffer = [0u8; 8192];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => out.extend_from_slice(&buffer[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn status_class_check() {
        assert!(Response::new(200, ()).is_success());
        assert!(Response::new(204, ()).is_success());
        assert!(!Response::new(301, ()).is_success());
        assert!(!Response::new(404, ()).is_success());
        assert!(!Response::new(500, ()).is_success());
    }

    #[test]
    fn decode_utf8_label_variants() {
        assert_eq!(decode_text("grün".as_bytes(), "utf-8").unwrap(), "grün");
        assert_eq!(decode_text("grün".as_bytes(), "UTF8").unwrap(), "grün");
    }

    #[test]
    fn decode_utf8_is_lossy_not_fatal() {
        let decoded = decode_text(&[0x61, 0xFF, 0x62], "utf-8").unwrap();
        assert_eq!(decoded, "a\u{FFFD}b");
    }

    #[test]
    fn decode_latin1() {
        let decoded = decode_text(&[0x63, 0x61, 0x66, 0xE9], "iso-8859-1").unwrap();
        assert_eq!(decoded, "café");
        assert_eq!(decode_text(&[0xE9], "Latin-1").unwrap(), "é");
    }

    #[test]
    fn decode_ascii_replaces_high_bytes() {
        let decoded = decode_text(&[0x68, 0x69, 0xC3], "us-ascii").unwrap();
        assert_eq!(decoded, "hi\u{FFFD}");
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = decode_text(b"x", "utf-16").unwrap_err();
        assert!(matches!(err, Error::UnsupportedEncoding(label) if label == "utf-16"));
    }

    #[test]
    fn whole_stream_reader_crosses_chunk_boundaries() {
        let input: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        let out = read_whole_stream(Cursor::new(input.clone())).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn whole_stream_reader_handles_empty_body() {
        let out = read_whole_stream(Cursor::new(Vec::new())).unwrap();
        assert!(out.is_empty());
    }
}
