//! Cookie record: attribute validation and `Set-Cookie` rendering.

use std::str::FromStr;
use std::sync::LazyLock;
use std::time::{Duration, SystemTime};

use regex::Regex;

use crate::error::{Error, Result};

/// Matches field-content from RFC 7230 sec 3.2: visible ASCII plus space,
/// horizontal tab and the %x80-FF obs-text range.
static FIELD_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\t\x20-\x7e\u{0080}-\u{00ff}]+$").expect("Invalid regex"));

/// Value of the `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    None,
    Strict,
}

impl SameSite {
    /// Lowercased attribute value as it appears on the wire.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "lax",
            SameSite::None => "none",
            SameSite::Strict => "strict",
        }
    }
}

impl FromStr for SameSite {
    type Err = Error;

    /// Case-insensitive parse of `lax`, `none` or `strict`.
    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("lax") {
            Ok(SameSite::Lax)
        } else if s.eq_ignore_ascii_case("none") {
            Ok(SameSite::None)
        } else if s.eq_ignore_ascii_case("strict") {
            Ok(SameSite::Strict)
        } else {
            Err(Error::Invalid {
                attribute: "sameSite",
            })
        }
    }
}

/// Attributes accepted by [`CookieJar::set`](crate::CookieJar::set).
///
/// Unset fields fall back to the record defaults: path `/`, `httponly` on,
/// everything else absent. `signed` and `secure_proxy` are interpreted by
/// the jar rather than rendered.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Cookie path. `None` defaults to `/`; an empty string suppresses the
    /// attribute entirely.
    pub path: Option<String>,
    /// Cookie domain.
    pub domain: Option<String>,
    /// Absolute expiry time.
    pub expires: Option<SystemTime>,
    /// Relative expiry, translated to an absolute `expires` at render time.
    pub max_age: Option<Duration>,
    /// Restrict the cookie to secure connections. `None` inherits the jar's
    /// security context.
    pub secure: Option<bool>,
    /// Hide the cookie from client-side scripts. Defaults to true.
    pub http_only: Option<bool>,
    /// `SameSite` attribute.
    pub same_site: Option<SameSite>,
    /// Drop pending same-named `Set-Cookie` lines before appending.
    pub overwrite: bool,
    /// Write a companion `.sig` cookie. `None` defaults to whether the jar
    /// holds signing keys.
    pub signed: Option<bool>,
    /// Deprecated alias for `secure`, kept for callers behind TLS-terminating
    /// proxies. Overrides `secure` when present.
    pub secure_proxy: Option<bool>,
}

/// A single `Set-Cookie` record.
///
/// Constructed fresh per `set` call, rendered once to a header line, then
/// discarded. Validation happens at construction; no partially valid record
/// escapes.
#[derive(Debug, Clone)]
pub struct Cookie {
    name: String,
    value: String,
    path: String,
    domain: Option<String>,
    expires: Option<SystemTime>,
    max_age: Option<Duration>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
    overwrite: bool,
}

impl Cookie {
    /// Validate and build a record.
    ///
    /// An empty `value` turns the record into a deletion marker: expiry is
    /// forced to the Unix epoch and any caller-supplied `expires`/`max_age`
    /// is dropped.
    pub fn new(name: &str, value: &str, opts: &SetOptions) -> Result<Self> {
        if !FIELD_CONTENT.is_match(name) {
            return Err(Error::Invalid { attribute: "name" });
        }
        if !value.is_empty() && !FIELD_CONTENT.is_match(value) {
            return Err(Error::Invalid { attribute: "value" });
        }

        let path = opts.path.clone().unwrap_or_else(|| "/".to_string());
        if !path.is_empty() && !FIELD_CONTENT.is_match(&path) {
            return Err(Error::Invalid { attribute: "path" });
        }

        if let Some(domain) = opts.domain.as_deref() {
            if !domain.is_empty() && !FIELD_CONTENT.is_match(domain) {
                return Err(Error::Invalid {
                    attribute: "domain",
                });
            }
        }

        let (expires, max_age) = if value.is_empty() {
            (Some(SystemTime::UNIX_EPOCH), None)
        } else {
            (opts.expires, opts.max_age)
        };

        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
            path,
            domain: opts.domain.clone(),
            expires,
            max_age,
            secure: opts.secure.unwrap_or(false),
            http_only: opts.http_only.unwrap_or(true),
            same_site: opts.same_site,
            overwrite: opts.overwrite,
        })
    }

    /// Get the cookie name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the cookie value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether this record replaces pending same-named lines.
    #[inline]
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Derive the companion `.sig` record carrying `signature`, sharing
    /// every attribute of this record (a deletion marker keeps its epoch
    /// expiry on the signature side too).
    pub(crate) fn signature_record(&self, signature: String) -> Cookie {
        let mut sig = self.clone();
        sig.name = format!("{}.sig", self.name);
        sig.value = signature;
        sig
    }

    /// Render the `Set-Cookie` header line.
    ///
    /// Attribute order is fixed: path, expires, domain, samesite, secure,
    /// httponly. `max_age` is folded into an absolute `expires` here and
    /// never emitted as its own attribute.
    pub fn to_header(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);

        let expires = match self.max_age {
            Some(max_age) => SystemTime::now().checked_add(max_age),
            None => self.expires,
        };

        if !self.path.is_empty() {
            header.push_str("; path=");
            header.push_str(&self.path);
        }
        if let Some(expires) = expires {
            header.push_str("; expires=");
            header.push_str(&http_date(expires));
        }
        if let Some(domain) = self.domain.as_deref() {
            if !domain.is_empty() {
                header.push_str("; domain=");
                header.push_str(domain);
            }
        }
        if let Some(same_site) = self.same_site {
            header.push_str("; samesite=");
            header.push_str(same_site.as_str());
        }
        if self.secure {
            header.push_str("; secure");
        }
        if self.http_only {
            header.push_str("; httponly");
        }

        header
    }
}

/// Format a timestamp as an RFC 7231 IMF-fixdate, e.g.
/// `Sun, 06 Nov 1994 08:49:37 GMT`.
fn http_date(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
