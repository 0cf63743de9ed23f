//! Error types for jar operations and cookie construction.

use std::fmt;

/// Errors raised by [`CookieJar`](crate::CookieJar) operations and
/// [`Cookie`](crate::Cookie) construction.
#[derive(Debug)]
pub enum Error {
    /// A signed read or write was requested but the jar has no signing keys.
    MissingKeys,

    /// A secure cookie was requested on a connection not marked secure.
    InsecureContext,

    /// A cookie attribute failed field-content validation.
    Invalid {
        attribute: &'static str,
    },

    /// A key set was constructed from an empty key list.
    EmptyKeySet,

    /// HTTP header error.
    Http(http::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingKeys => write!(f, "keys required for signed cookies"),
            Error::InsecureContext => {
                write!(f, "cannot send secure cookie over unencrypted connection")
            }
            Error::Invalid { attribute } => write!(f, "cookie {} is invalid", attribute),
            Error::EmptyKeySet => write!(f, "key set requires at least one key"),
            Error::Http(e) => write!(f, "HTTP error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::Http(e)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(e: http::header::InvalidHeaderValue) -> Self {
        Error::Http(e.into())
    }
}

/// Result type alias for jar operations.
pub type Result<T> = std::result::Result<T, Error>;
