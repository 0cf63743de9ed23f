//! keyed_cookies - Signed HTTP cookies over `http` request/response headers.
//!
//! This crate reads cookies from a request's `Cookie` header and queues
//! `Set-Cookie` lines on a response, optionally protecting cookie integrity
//! with rotating HMAC signatures carried in companion `.sig` cookies.
//!
//! # Features
//!
//! - **Signed cookies**: tamper detection via a `.sig` companion cookie,
//!   verified against an ordered key ring with silent re-signing after key
//!   rotation
//! - **Self-healing reads**: an invalid signature reads as absent and queues
//!   an expired `.sig` cookie on the response
//! - **Overwrite policy**: a write can replace pending same-named
//!   `Set-Cookie` lines instead of stacking duplicates
//! - **Strict validation**: names, values, paths and domains are checked
//!   against the header field-content character class at construction
//! - **Security gate**: secure cookies are refused on connections not marked
//!   secure
//!
//! # Example
//!
//! ```rust
//! use http::HeaderMap;
//! use keyed_cookies::{CookieJar, JarConfig, JarOptions, SetOptions};
//!
//! # fn main() -> keyed_cookies::Result<()> {
//! let request = HeaderMap::new();
//! let mut response = HeaderMap::new();
//!
//! let config = JarConfig::with_keys(["current-key", "retired-key"])?.secure(true);
//! let mut jar = CookieJar::with_options(&request, &mut response, JarOptions::Config(config))?;
//!
//! jar.set("session", "abc123", &SetOptions::default())?;
//! # Ok(())
//! # }
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cookie;
mod deprecation;
pub mod error;
pub mod jar;
pub mod keys;

// Re-exports for convenience
pub use cookie::{Cookie, SameSite, SetOptions};
pub use error::{Error, Result};
pub use jar::{CookieJar, GetOptions, JarConfig, JarOptions};
pub use keys::{KeySet, Signer};
