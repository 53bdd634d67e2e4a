//! Credential hashing port

use crate::domain::result::Result;

/// Salted password hashing
///
/// The identity service only ever stores what `hash` returns and only
/// checks passwords through `verify`.
pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing salted hash of `password`
    fn hash(&self, password: &str) -> Result<String>;

    /// Check `password` against a value previously returned by `hash`
    ///
    /// Returns `Ok(false)` on mismatch and `Err` only if `hash` is malformed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}
