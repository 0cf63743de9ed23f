//! Test helpers and utilities

use http::header::{HeaderValue, COOKIE, SET_COOKIE};
use http::HeaderMap;

/// Header state for one simulated request/response exchange.
pub struct Exchange {
    pub request: HeaderMap,
    pub response: HeaderMap,
}

#[allow(dead_code)]
impl Exchange {
    /// Exchange with no cookies on the request.
    pub fn new() -> Self {
        Self {
            request: HeaderMap::new(),
            response: HeaderMap::new(),
        }
    }

    /// Exchange whose request carries a raw `Cookie` header.
    pub fn with_cookie_header(header: &str) -> Self {
        let mut request = HeaderMap::new();
        request.insert(COOKIE, HeaderValue::from_str(header).expect("Invalid header"));
        Self {
            request,
            response: HeaderMap::new(),
        }
    }

    /// Follow-up exchange: echo every pending `Set-Cookie` pair back as the
    /// next request's `Cookie` header, the way a client would.
    pub fn replay(&self) -> Self {
        let pairs: Vec<&str> = set_cookie_lines(&self.response)
            .into_iter()
            .map(cookie_pair)
            .collect();

        if pairs.is_empty() {
            Self::new()
        } else {
            Self::with_cookie_header(&pairs.join("; "))
        }
    }
}

/// Pending `Set-Cookie` lines on a response, in insertion order.
pub fn set_cookie_lines(headers: &HeaderMap) -> Vec<&str> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("Invalid header"))
        .collect()
}

/// Strip the attributes off a `Set-Cookie` line, leaving `name=value`.
pub fn cookie_pair(line: &str) -> &str {
    line.split(';').next().unwrap_or(line)
}
