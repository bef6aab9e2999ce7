//! Cross-site request guard for state-changing routes.
//!
//! Browsers attach `Origin` (and `Sec-Fetch-Site`) to cross-site writes, so a
//! POST/PUT/PATCH/DELETE is refused unless its origin is the server itself or
//! one of `server.allowed_origins`. Requests without those headers come from
//! non-browser clients and pass.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{errors::JsonApiError, state::ServerState};

const SEC_FETCH_SITE: &str = "sec-fetch-site";

fn is_state_changing(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

/// Decide whether a write with these headers may proceed.
pub fn check_origin(headers: &HeaderMap, allowed: &[String]) -> Result<(), &'static str> {
    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    let fetch_site = headers.get(SEC_FETCH_SITE).and_then(|v| v.to_str().ok());

    match origin {
        Some(origin) => {
            let origin = origin.trim().trim_end_matches('/');
            if allowed.iter().any(|a| a == origin) || is_same_host(origin, host) {
                Ok(())
            } else {
                Err("origin not allowed")
            }
        }
        None if fetch_site.is_some_and(|s| s.eq_ignore_ascii_case("cross-site")) => {
            Err("cross-site request without origin")
        }
        None => Ok(()),
    }
}

fn is_same_host(origin: &str, host: Option<&str>) -> bool {
    let Some(host) = host else { return false };
    origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .is_some_and(|rest| rest.eq_ignore_ascii_case(host))
}

/// Middleware: reject untrusted cross-site writes with 403.
pub async fn require_trusted_origin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    if !is_state_changing(req.method()) {
        return Ok(next.run(req).await);
    }
    if let Err(reason) = check_origin(req.headers(), &state.allowed_origins) {
        warn!(method = %req.method(), path = %req.uri().path(), reason, "cross-site request rejected");
        return Err(JsonApiError::forbidden(reason));
    }
    Ok(next.run(req).await)
}
