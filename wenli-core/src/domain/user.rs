//! User and session domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of a registered user
///
/// This is what register/login hand back to callers. It never carries
/// the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A user as persisted in the users collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    /// PHC-formatted salted hash produced by a `CredentialHasher`
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            created_at,
        }
    }

    /// Strip the credential
    pub fn to_public(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

/// The currently authenticated user
///
/// Ledger and statistics operations take a `&Session` explicitly; the
/// persisted session slot is only a cache of the last login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub username: String,
}

impl Session {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }

    /// Whether this session belongs to the given user id
    pub fn owns(&self, user_id: &str) -> bool {
        self.id == user_id
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self::new(user.id.clone(), user.username.clone())
    }
}
