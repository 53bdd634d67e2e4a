//! Session service - the persisted "current user" slot

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{Session, User};

use super::collections::{Collections, StorageKey};

/// Owns the single session slot
///
/// No expiry, no token, one session at a time.
pub struct SessionService {
    collections: Arc<Collections>,
}

impl SessionService {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }

    /// Remember `user` as the current user, replacing any previous session
    pub fn set_current_user(&self, user: &User) -> Result<Session> {
        let session = Session::from(user);
        self.collections.write_slot(StorageKey::Session, &session)?;
        tracing::debug!(user_id = %session.id, "session started");
        Ok(session)
    }

    /// The remembered user, if any
    pub fn current_user(&self) -> Result<Option<Session>> {
        self.collections.read_slot(StorageKey::Session)
    }

    /// Forget the current user. Logging out with no session is a no-op.
    pub fn logout(&self) -> Result<()> {
        self.collections.clear(StorageKey::Session)?;
        tracing::debug!("session cleared");
        Ok(())
    }
}
