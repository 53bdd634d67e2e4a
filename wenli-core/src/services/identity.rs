//! Identity service - registration and login

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{User, UserRecord};
use crate::ports::{Clock, CredentialHasher, IdGenerator};

use super::collections::{Collections, StorageKey};

/// Owns the users collection
pub struct IdentityService {
    collections: Arc<Collections>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    hasher: Arc<dyn CredentialHasher>,
}

impl IdentityService {
    pub fn new(
        collections: Arc<Collections>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            collections,
            ids,
            clock,
            hasher,
        }
    }

    /// Register a new user
    ///
    /// Returns `Ok(None)` when the username is already taken (exact,
    /// case-sensitive match). Only the salted hash of `password` is stored.
    pub fn register(&self, username: &str, password: &str) -> Result<Option<User>> {
        if username.is_empty() {
            return Err(Error::validation("Username must not be empty"));
        }

        let mut users: Vec<UserRecord> = self.collections.read(StorageKey::Users)?;
        if users.iter().any(|u| u.username == username) {
            tracing::info!("registration rejected: username taken");
            return Ok(None);
        }

        let id = self.fresh_id(&users);
        let password_hash = self.hasher.hash(password)?;
        let record = UserRecord::new(id, username, password_hash, self.clock.now());
        let user = record.to_public();

        users.push(record);
        self.collections.write(StorageKey::Users, &users)?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(Some(user))
    }

    /// Check credentials
    ///
    /// Returns `Ok(None)` when no user has this username or the password
    /// does not match.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<User>> {
        let users: Vec<UserRecord> = self.collections.read(StorageKey::Users)?;

        let Some(record) = users.iter().find(|u| u.username == username) else {
            tracing::info!("login rejected: unknown username");
            return Ok(None);
        };

        if !self.hasher.verify(password, &record.password_hash)? {
            tracing::info!(user_id = %record.id, "login rejected: wrong password");
            return Ok(None);
        }

        tracing::info!(user_id = %record.id, "login succeeded");
        Ok(Some(record.to_public()))
    }

    /// Whether a user with exactly this username exists
    pub fn username_exists(&self, username: &str) -> Result<bool> {
        let users: Vec<UserRecord> = self.collections.read(StorageKey::Users)?;
        Ok(users.iter().any(|u| u.username == username))
    }

    /// Look up a user's public record by id
    pub fn find_user(&self, id: &str) -> Result<Option<User>> {
        let users: Vec<UserRecord> = self.collections.read(StorageKey::Users)?;
        Ok(users.iter().find(|u| u.id == id).map(UserRecord::to_public))
    }

    pub fn user_count(&self) -> Result<usize> {
        let users: Vec<UserRecord> = self.collections.read(StorageKey::Users)?;
        Ok(users.len())
    }

    /// Draw ids until one is unused
    fn fresh_id(&self, users: &[UserRecord]) -> String {
        loop {
            let id = self.ids.next_id();
            if !users.iter().any(|u| u.id == id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::adapters::{Argon2Hasher, FixedClock, MemoryStore, SequentialIds};
    use crate::ports::KeyValueStore;
    use crate::services::collections::{CorruptDataPolicy, DEFAULT_NAMESPACE};

    fn service() -> (Arc<MemoryStore>, IdentityService) {
        let store = Arc::new(MemoryStore::new());
        let collections = Arc::new(Collections::new(
            store.clone(),
            DEFAULT_NAMESPACE,
            CorruptDataPolicy::Fail,
        ));
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap());
        let service = IdentityService::new(
            collections,
            Arc::new(SequentialIds::new("user-")),
            Arc::new(clock),
            Arc::new(Argon2Hasher::with_params(8, 1, 1).unwrap()),
        );
        (store, service)
    }

    #[test]
    fn test_register_twice_conflicts() {
        let (_, service) = service();

        let first = service.register("alice", "secret").unwrap();
        assert_eq!(first.as_ref().map(|u| u.username.as_str()), Some("alice"));
        assert_eq!(first.unwrap().id, "user-1");

        assert!(service.register("alice", "other").unwrap().is_none());
        assert_eq!(service.user_count().unwrap(), 1);
    }

    #[test]
    fn test_usernames_are_case_sensitive() {
        let (_, service) = service();
        assert!(service.register("alice", "secret").unwrap().is_some());
        assert!(service.register("Alice", "secret").unwrap().is_some());
        assert!(service.login("ALICE", "secret").unwrap().is_none());
    }

    #[test]
    fn test_login_after_register() {
        let (_, service) = service();
        let registered = service.register("alice", "secret").unwrap().unwrap();

        let user = service.login("alice", "secret").unwrap().unwrap();
        assert_eq!(user, registered);
        assert!(serde_json::to_value(&user).unwrap().get("passwordHash").is_none());

        assert!(service.login("alice", "wrong").unwrap().is_none());
        assert!(service.login("bob", "secret").unwrap().is_none());
    }

    #[test]
    fn test_password_never_stored_in_clear() {
        let (store, service) = service();
        service.register("alice", "secret-password").unwrap();

        let raw = store.get("wenli_wallet_users").unwrap().unwrap();
        assert!(!raw.contains("secret-password"));
        assert!(raw.contains("$argon2id$"));
        assert!(!raw.contains("\"password\""));
    }

    #[test]
    fn test_empty_username_rejected() {
        let (_, service) = service();
        assert!(matches!(service.register("", "secret"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_fresh_id_skips_existing() {
        let (store, service) = service();
        // Seed a record that collides with the generator's first id
        store
            .set(
                "wenli_wallet_users",
                r#"[{"id":"user-1","username":"seed","passwordHash":"x","createdAt":"2025-01-01T00:00:00Z"}]"#,
            )
            .unwrap();

        let user = service.register("alice", "secret").unwrap().unwrap();
        assert_eq!(user.id, "user-2");
        assert_eq!(service.find_user("user-1").unwrap().unwrap().username, "seed");
        assert!(service.username_exists("seed").unwrap());
    }
}
