//! Ledger service - transaction CRUD scoped to the session user

use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{NewTransaction, Session, Transaction, TransactionFilter, TransactionPatch};
use crate::ports::{Clock, IdGenerator};

use super::collections::{Collections, StorageKey};

/// Owns the transactions collection
///
/// Every operation reads the whole collection, changes a copy and writes it
/// back before returning. Records owned by another user are invisible: they
/// read as missing, cannot be updated and are not deleted.
pub struct LedgerService {
    collections: Arc<Collections>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    pub fn new(collections: Arc<Collections>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { collections, ids, clock }
    }

    /// The session user's transactions, newest `date` first
    ///
    /// Ties on `date` are broken by `created_at` then `id`, both descending.
    pub fn transactions(&self, session: &Session) -> Result<Vec<Transaction>> {
        let mut owned: Vec<Transaction> = self
            .load()?
            .into_iter()
            .filter(|tx| session.owns(&tx.user_id))
            .collect();
        owned.sort_by(newest_first);
        Ok(owned)
    }

    /// Same ordering as `transactions`, narrowed by `filter`
    pub fn search(&self, session: &Session, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut matched = self.transactions(session)?;
        matched.retain(|tx| filter.matches(tx));
        Ok(matched)
    }

    /// One transaction owned by the session user
    pub fn get(&self, session: &Session, id: &str) -> Result<Option<Transaction>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|tx| tx.id == id && session.owns(&tx.user_id)))
    }

    /// Record a new transaction for the session user
    pub fn add(&self, session: &Session, data: NewTransaction) -> Result<Transaction> {
        data.validate()?;

        let mut all = self.load()?;
        let tx = Transaction {
            id: self.fresh_id(&all),
            user_id: session.id.clone(),
            kind: data.kind,
            category: data.category,
            amount: data.amount,
            date: data.date,
            note: data.note,
            created_at: self.clock.now(),
        };

        all.push(tx.clone());
        self.save(&all)?;

        tracing::debug!(tx_id = %tx.id, user_id = %tx.user_id, "transaction added");
        Ok(tx)
    }

    /// Merge `patch` over the stored record
    ///
    /// Returns `Ok(None)` when no record with `id` is owned by the session
    /// user.
    pub fn update(
        &self,
        session: &Session,
        id: &str,
        patch: &TransactionPatch,
    ) -> Result<Option<Transaction>> {
        patch.validate()?;

        let mut all = self.load()?;
        let Some(tx) = all.iter_mut().find(|tx| tx.id == id) else {
            return Ok(None);
        };
        if !session.owns(&tx.user_id) {
            tracing::warn!(tx_id = %id, user_id = %session.id, "update of another user's transaction refused");
            return Ok(None);
        }

        patch.apply(tx);
        let updated = tx.clone();
        self.save(&all)?;

        tracing::debug!(tx_id = %updated.id, "transaction updated");
        Ok(Some(updated))
    }

    /// Remove a record if the session user owns it
    ///
    /// Unknown ids are a no-op. Returns whether anything was removed.
    pub fn delete(&self, session: &Session, id: &str) -> Result<bool> {
        let mut all = self.load()?;
        let Some(pos) = all.iter().position(|tx| tx.id == id) else {
            return Ok(false);
        };
        if !session.owns(&all[pos].user_id) {
            tracing::warn!(tx_id = %id, user_id = %session.id, "delete of another user's transaction refused");
            return Ok(false);
        }

        all.remove(pos);
        self.save(&all)?;

        tracing::debug!(tx_id = %id, "transaction deleted");
        Ok(true)
    }

    fn load(&self) -> Result<Vec<Transaction>> {
        self.collections.read(StorageKey::Transactions)
    }

    fn save(&self, all: &[Transaction]) -> Result<()> {
        self.collections.write(StorageKey::Transactions, all)
    }

    fn fresh_id(&self, all: &[Transaction]) -> String {
        loop {
            let id = self.ids.next_id();
            if !all.iter().any(|tx| tx.id == id) {
                return id;
            }
        }
    }
}

fn newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}
