//! Cookie jar bound to one request/response header pair.

use std::collections::HashMap;
use std::fmt;
use std::sync::{LazyLock, RwLock};

use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use regex::Regex;
use tracing::debug;

use crate::cookie::{Cookie, SetOptions};
use crate::deprecation::deprecation;
use crate::error::{Error, Result};
use crate::keys::{KeySet, Signer};

/// Compiled name-lookup patterns, keyed by cookie name.
///
/// Entries are pure functions of the name, so racing writers insert
/// identical values and the read-check-then-write below is safe. The map
/// grows with distinct names and is never evicted; cookie names form a
/// closed, small set in practice.
static PATTERNS: LazyLock<RwLock<HashMap<String, Regex>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Pattern matching `name=value` at the start of the header or after a
/// `;` separator, with the name escaped literally.
fn cookie_pattern(name: &str) -> Regex {
    if let Ok(cache) = PATTERNS.read() {
        if let Some(pattern) = cache.get(name) {
            return pattern.clone();
        }
    }

    let pattern = Regex::new(&format!("(?:^|;) *{}=([^;]*)", regex::escape(name)))
        .expect("Invalid regex");

    if let Ok(mut cache) = PATTERNS.write() {
        cache.insert(name.to_string(), pattern.clone());
    }
    pattern
}

/// Options for [`CookieJar::get`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions {
    /// Require (or skip) signature verification. `None` defaults to whether
    /// the jar holds signing keys.
    pub signed: Option<bool>,
}

impl GetOptions {
    /// Explicitly request or skip signature verification.
    pub fn signed(signed: bool) -> Self {
        Self {
            signed: Some(signed),
        }
    }
}

/// Canonical jar configuration.
#[derive(Default)]
pub struct JarConfig {
    /// Signing capability for `.sig` companion cookies.
    pub keys: Option<Box<dyn Signer>>,
    /// Whether the underlying connection is considered secure. `None` means
    /// unknown: explicit `secure: true` writes are rejected rather than
    /// inferred.
    pub secure: Option<bool>,
}

impl JarConfig {
    /// Empty configuration: no keys, unknown security context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a list of secret keys, newest first, into the default
    /// [`KeySet`] capability.
    pub fn with_keys<I, K>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        Ok(Self {
            keys: Some(Box::new(KeySet::new(keys)?)),
            secure: None,
        })
    }

    /// Use a caller-provided signing capability.
    pub fn with_signer<S: Signer + 'static>(signer: S) -> Self {
        Self {
            keys: Some(Box::new(signer)),
            secure: None,
        }
    }

    /// Mark the connection security context.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }
}

/// Accepted jar construction forms.
///
/// The deprecated variants are translated to the canonical configuration at
/// construction time with a deprecation report.
pub enum JarOptions {
    /// Canonical form.
    Config(JarConfig),
    /// Deprecated: bare list of signing keys, newest first.
    Keys(Vec<String>),
    /// Deprecated: pre-built signing capability.
    Signer(Box<dyn Signer>),
}

/// Cookie access for one request/response exchange.
///
/// A jar reads the `Cookie` header from the bound request side and writes
/// `Set-Cookie` lines to the bound response side. It is scoped to a single
/// exchange and holds no per-cookie state of its own.
pub struct CookieJar<'a> {
    request: &'a HeaderMap,
    response: &'a mut HeaderMap,
    keys: Option<Box<dyn Signer>>,
    secure: Option<bool>,
}

// Signing capability and header contents stay out of debug output.
impl fmt::Debug for CookieJar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieJar")
            .field("secure", &self.secure)
            .field("keys", &self.keys.is_some())
            .finish()
    }
}

impl<'a> CookieJar<'a> {
    /// Jar with no signing keys and an unknown security context.
    pub fn new(request: &'a HeaderMap, response: &'a mut HeaderMap) -> Self {
        Self {
            request,
            response,
            keys: None,
            secure: None,
        }
    }

    /// Jar configured from one of the accepted option forms.
    pub fn with_options(
        request: &'a HeaderMap,
        response: &'a mut HeaderMap,
        options: JarOptions,
    ) -> Result<Self> {
        let (keys, secure) = match options {
            JarOptions::Config(config) => (config.keys, config.secure),
            JarOptions::Keys(keys) => {
                deprecation(
                    "keys list argument",
                    "provide keys via JarOptions::Config",
                );
                (
                    Some(Box::new(KeySet::new(keys)?) as Box<dyn Signer>),
                    None,
                )
            }
            JarOptions::Signer(signer) => {
                deprecation(
                    "bare signer argument",
                    "provide the signer via JarOptions::Config",
                );
                (Some(signer), None)
            }
        };

        Ok(Self {
            request,
            response,
            keys,
            secure,
        })
    }

    /// Read the cookie `name` from the request's `Cookie` header.
    ///
    /// With signing in effect (explicitly requested, or defaulted from the
    /// presence of keys), the companion `{name}.sig` cookie is fetched and
    /// verified. An unsigned value is never trusted when signing was
    /// requested. An invalid signature reads as absent and queues an
    /// expired `.sig` cookie on the response; a signature from a
    /// rotated-out key is refreshed with the newest key as a side effect.
    ///
    /// The only error this path raises is [`Error::MissingKeys`], when
    /// verification is reached without a signing capability.
    pub fn get(&mut self, name: &str, opts: &GetOptions) -> Result<Option<String>> {
        let signed = opts.signed.unwrap_or(self.keys.is_some());

        let Some(value) = self.request_cookie(name) else {
            return Ok(None);
        };
        if !signed {
            return Ok(Some(value));
        }

        let sig_name = format!("{name}.sig");
        let Some(remote) = self.request_cookie(&sig_name) else {
            return Ok(None);
        };

        let keys = self.keys.as_deref().ok_or(Error::MissingKeys)?;
        let data = format!("{name}={value}");

        match keys.verify_index(&data, &remote) {
            Some(0) => Ok(Some(value)),
            Some(_) => {
                let refreshed = keys.sign(&data);
                self.repair_signature(&sig_name, &refreshed);
                Ok(Some(value))
            }
            None => {
                self.repair_signature(&sig_name, "");
                Ok(None)
            }
        }
    }

    /// Write the cookie `name=value` to the response's `Set-Cookie` header.
    ///
    /// An empty `value` queues a deletion marker. With signing in effect, a
    /// companion `{name}.sig` cookie carrying the signature of
    /// `{name}={value}` is queued with the same attributes. Existing
    /// pending lines are preserved, subject to the record's overwrite
    /// policy. Returns the jar for call chaining.
    pub fn set(&mut self, name: &str, value: &str, opts: &SetOptions) -> Result<&mut Self> {
        let mut lines: Vec<HeaderValue> =
            self.response.get_all(SET_COOKIE).iter().cloned().collect();

        let secure_context = self.secure.unwrap_or(false);
        if !secure_context && opts.secure == Some(true) {
            return Err(Error::InsecureContext);
        }

        let mut record_opts = opts.clone();
        record_opts.secure = Some(opts.secure.unwrap_or(secure_context));
        if let Some(secure_proxy) = opts.secure_proxy {
            deprecation(
                "secureProxy option",
                "use the secure option, marking the jar config secure if needed",
            );
            record_opts.secure = Some(secure_proxy);
        }

        let cookie = Cookie::new(name, value, &record_opts)?;
        push_cookie(&mut lines, &cookie)?;

        let signed = opts.signed.unwrap_or(self.keys.is_some());
        if signed {
            let keys = self.keys.as_deref().ok_or(Error::MissingKeys)?;
            let signature = keys.sign(&format!("{}={}", cookie.name(), cookie.value()));
            let sig = cookie.signature_record(signature);
            push_cookie(&mut lines, &sig)?;
        }

        self.response.remove(SET_COOKIE);
        for line in lines {
            self.response.append(SET_COOKIE, line);
        }

        Ok(self)
    }

    /// First match for `name` across the request's `Cookie` header values.
    fn request_cookie(&self, name: &str) -> Option<String> {
        let pattern = cookie_pattern(name);

        for header in self.request.get_all(COOKIE) {
            let Ok(header) = std::str::from_utf8(header.as_bytes()) else {
                continue;
            };
            if let Some(value) = pattern.captures(header).and_then(|c| c.get(1)) {
                return Some(value.as_str().to_string());
            }
        }
        None
    }

    /// Queue an overwritten `.sig` cookie on the response: expired when
    /// `signature` is empty, refreshed otherwise. Response-side repair
    /// only; failures are logged and never surfaced to the reader.
    fn repair_signature(&mut self, sig_name: &str, signature: &str) {
        let opts = SetOptions {
            path: Some("/".to_string()),
            signed: Some(false),
            overwrite: true,
            ..Default::default()
        };
        if let Err(error) = self.set(sig_name, signature, &opts) {
            debug!(cookie = sig_name, %error, "failed to repair signature cookie");
        }
    }
}

/// Append a rendered cookie line, honoring the record's overwrite policy:
/// pending lines for the same cookie name are dropped first.
fn push_cookie(lines: &mut Vec<HeaderValue>, cookie: &Cookie) -> Result<()> {
    if cookie.overwrite() {
        let prefix = format!("{}=", cookie.name());
        lines.retain(|line| !line.as_bytes().starts_with(prefix.as_bytes()));
    }

    let line = HeaderValue::from_str(&cookie.to_header())?;
    lines.push(line);
    Ok(())
}
