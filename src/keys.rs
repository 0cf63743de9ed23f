//! Message signing against an ordered, rotating key ring.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Capability to sign cookie payloads and verify signatures against a set
/// of rotating keys.
///
/// Implemented by [`KeySet`]; bring your own implementation to back
/// signatures with an HSM, a remote signer or a different algorithm.
pub trait Signer: Send + Sync {
    /// Signature over `message` using the newest key.
    fn sign(&self, message: &str) -> String;

    /// Index of the key that validates `signature` for `message`.
    ///
    /// `Some(0)` means the newest key, `Some(n)` with `n > 0` an older key
    /// whose signature should be rotated forward, `None` that no key
    /// matches.
    fn verify_index(&self, message: &str, signature: &str) -> Option<usize>;
}

/// HMAC-SHA256 key ring, newest key first.
///
/// Signatures are URL-safe unpadded base64, so they always satisfy cookie
/// field-content rules.
pub struct KeySet {
    keys: Vec<Vec<u8>>,
}

impl KeySet {
    /// Build a key ring from secret keys ordered newest to oldest.
    pub fn new<I, K>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let keys: Vec<Vec<u8>> = keys.into_iter().map(|k| k.as_ref().to_vec()).collect();
        if keys.is_empty() {
            return Err(Error::EmptyKeySet);
        }
        Ok(Self { keys })
    }
}

impl Signer for KeySet {
    fn sign(&self, message: &str) -> String {
        let mut mac = mac_for(&self.keys[0]);
        mac.update(message.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    fn verify_index(&self, message: &str, signature: &str) -> Option<usize> {
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        self.keys.iter().position(|key| {
            let mut mac = mac_for(key);
            mac.update(message.as_bytes());
            // Constant-time comparison.
            mac.verify_slice(&signature).is_ok()
        })
    }
}

// Key material stays out of debug output.
impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("keys", &self.keys.len())
            .finish()
    }
}

fn mac_for(key: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length.
    HmacSha256::new_from_slice(key).expect("Invalid HMAC key length")
}
