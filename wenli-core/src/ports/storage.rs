//! Storage port - string-keyed local storage medium

use crate::domain::result::Result;

/// String-keyed storage abstraction
///
/// Values are opaque strings; typing and serialization live in
/// `services::Collections`. A single `set` must replace the whole value
/// for that key. There is no cross-key atomicity.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored, sorted
    fn keys(&self) -> Result<Vec<String>>;
}
