//! JSON responder that renders bodies indented with four spaces.
//!
//! `serde_json` leaves non-ASCII characters unescaped, so Cyrillic or accented
//! names reach the client as plain UTF-8.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

const INDENT: &[u8] = b"    ";

/// Serialize `value` with a four-space indent.
pub fn to_pretty_vec<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Like `axum::Json`, but pretty-printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match to_pretty_vec(&self.0) {
            Ok(buf) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                buf,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
                    "Internal Server Error",
                )
                    .into_response()
            }
        }
    }
}
