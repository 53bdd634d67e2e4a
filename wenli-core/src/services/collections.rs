//! Typed collections over the key-value store
//!
//! Each logical collection (users, transactions) is one JSON array under one
//! key, and the session is one JSON object under its own key. Every write
//! replaces the whole value for that key.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

/// Default key prefix
pub const DEFAULT_NAMESPACE: &str = "wenli_wallet";

/// What to do when a stored value cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CorruptDataPolicy {
    /// Return `Error::CorruptData`
    #[default]
    Fail,
    /// Read as an empty collection / absent slot and log a warning
    TreatAsEmpty,
}

/// The logical keys the wallet stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Users,
    Transactions,
    Session,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Users, StorageKey::Transactions, StorageKey::Session];

    fn suffix(&self) -> &'static str {
        match self {
            StorageKey::Users => "users",
            StorageKey::Transactions => "transactions",
            StorageKey::Session => "session",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Persistence adapter shared by the identity, session and ledger services
pub struct Collections {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    on_corrupt: CorruptDataPolicy,
}

impl Collections {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        namespace: impl Into<String>,
        on_corrupt: CorruptDataPolicy,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            on_corrupt,
        }
    }

    /// Full storage key, e.g. `wenli_wallet_transactions`
    pub fn key(&self, key: StorageKey) -> String {
        format!("{}_{}", self.namespace, key.suffix())
    }

    /// Read a whole collection; absent keys read as empty
    pub fn read<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Vec<T>> {
        let full_key = self.key(key);
        let parsed: Option<Option<Vec<T>>> = self.load(&full_key)?;
        Ok(parsed.flatten().unwrap_or_default())
    }

    /// Replace a whole collection
    pub fn write<T: Serialize>(&self, key: StorageKey, items: &[T]) -> Result<()> {
        let full_key = self.key(key);
        let payload = serde_json::to_string(items)?;
        self.store.set(&full_key, &payload)?;
        tracing::debug!(key = %full_key, count = items.len(), "wrote collection");
        Ok(())
    }

    /// Read a single-object slot
    pub fn read_slot<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        let full_key = self.key(key);
        let parsed: Option<Option<T>> = self.load(&full_key)?;
        Ok(parsed.flatten())
    }

    /// Replace a single-object slot
    pub fn write_slot<T: Serialize>(&self, key: StorageKey, value: &T) -> Result<()> {
        let full_key = self.key(key);
        let payload = serde_json::to_string(value)?;
        self.store.set(&full_key, &payload)?;
        tracing::debug!(key = %full_key, "wrote slot");
        Ok(())
    }

    /// Remove whatever is stored under `key`
    pub fn clear(&self, key: StorageKey) -> Result<()> {
        self.store.remove(&self.key(key))
    }

    /// Report every wallet key whose stored value does not parse
    ///
    /// Ignores the corrupt-data policy: this is what a health check uses.
    pub fn corrupt_keys(&self) -> Result<Vec<(String, String)>> {
        let mut corrupt = Vec::new();
        for key in StorageKey::ALL {
            let full_key = self.key(key);
            let Some(raw) = self.store.get(&full_key)? else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            let outcome = match key {
                StorageKey::Session => {
                    serde_json::from_str::<Option<crate::domain::Session>>(&raw).map(|_| ())
                }
                StorageKey::Users => {
                    serde_json::from_str::<Option<Vec<crate::domain::UserRecord>>>(&raw).map(|_| ())
                }
                StorageKey::Transactions => {
                    serde_json::from_str::<Option<Vec<crate::domain::Transaction>>>(&raw)
                        .map(|_| ())
                }
            };
            if let Err(e) = outcome {
                corrupt.push((full_key, e.to_string()));
            }
        }
        Ok(corrupt)
    }

    /// Fetch and parse; `None` when absent or blank, policy applied on parse errors
    fn load<T: DeserializeOwned>(&self, full_key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(full_key)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => match self.on_corrupt {
                CorruptDataPolicy::Fail => Err(Error::corrupt(full_key, e.to_string())),
                CorruptDataPolicy::TreatAsEmpty => {
                    tracing::warn!(key = %full_key, error = %e, "unparsable stored data read as empty");
                    Ok(None)
                }
            },
        }
    }
}
