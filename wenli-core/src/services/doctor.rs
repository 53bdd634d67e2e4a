//! Doctor service - storage health checks

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::domain::category;
use crate::domain::result::Result;
use crate::domain::{Session, Transaction, UserRecord};

use super::collections::{Collections, StorageKey};

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Error,
}

/// Doctor service for health checks
///
/// Reads the raw collections and reports invariant violations the stores
/// themselves do not prevent (orphans, duplicates, corrupt payloads).
pub struct DoctorService {
    collections: Arc<Collections>,
}

impl DoctorService {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }

    /// Run all health checks
    pub fn run_checks(&self) -> Result<DoctorResult> {
        let mut checks = BTreeMap::new();

        let corrupt = self.collections.corrupt_keys()?;
        let corrupt_keys: HashSet<&str> = corrupt.iter().map(|(k, _)| k.as_str()).collect();
        checks.insert(
            "corrupt_data".to_string(),
            CheckResult::from_findings(
                CheckStatus::Error,
                corrupt
                    .iter()
                    .map(|(key, reason)| json!({"key": key, "reason": reason}))
                    .collect(),
                "All stored values parse",
                |n| format!("{} stored value(s) cannot be parsed", n),
            ),
        );

        let users_key = self.collections.key(StorageKey::Users);
        let tx_key = self.collections.key(StorageKey::Transactions);
        let session_key = self.collections.key(StorageKey::Session);

        let users: Option<Vec<UserRecord>> = if corrupt_keys.contains(users_key.as_str()) {
            None
        } else {
            Some(self.collections.read(StorageKey::Users)?)
        };
        let transactions: Option<Vec<Transaction>> = if corrupt_keys.contains(tx_key.as_str()) {
            None
        } else {
            Some(self.collections.read(StorageKey::Transactions)?)
        };
        let session: Option<Session> = if corrupt_keys.contains(session_key.as_str()) {
            None
        } else {
            self.collections.read_slot(StorageKey::Session)?
        };

        if let Some(users) = &users {
            checks.insert(
                "duplicate_usernames".to_string(),
                CheckResult::from_findings(
                    CheckStatus::Error,
                    duplicates(users.iter().map(|u| u.username.as_str()))
                        .into_iter()
                        .map(|(name, count)| json!({"username": name, "count": count}))
                        .collect(),
                    "All usernames are unique",
                    |n| format!("{} username(s) are registered more than once", n),
                ),
            );
        }

        if let Some(transactions) = &transactions {
            checks.insert(
                "duplicate_transaction_ids".to_string(),
                CheckResult::from_findings(
                    CheckStatus::Error,
                    duplicates(transactions.iter().map(|t| t.id.as_str()))
                        .into_iter()
                        .map(|(id, count)| json!({"transaction_id": id, "count": count}))
                        .collect(),
                    "All transaction ids are unique",
                    |n| format!("{} transaction id(s) are used more than once", n),
                ),
            );

            checks.insert(
                "negative_amounts".to_string(),
                CheckResult::from_findings(
                    CheckStatus::Error,
                    transactions
                        .iter()
                        .filter(|t| t.amount.is_sign_negative() && !t.amount.is_zero())
                        .map(|t| json!({"transaction_id": t.id}))
                        .collect(),
                    "No negative amounts",
                    |n| format!("{} transaction(s) have a negative amount", n),
                ),
            );

            checks.insert(
                "unlisted_categories".to_string(),
                CheckResult::from_findings(
                    CheckStatus::Warning,
                    transactions
                        .iter()
                        .filter(|t| !category::is_suggested(t.kind, &t.category))
                        .map(|t| json!({"transaction_id": t.id, "type": t.kind.as_str()}))
                        .collect(),
                    "All categories come from the suggestion lists",
                    |n| format!("{} transaction(s) use a category outside the suggestion list", n),
                ),
            );
        }

        if let (Some(users), Some(transactions)) = (&users, &transactions) {
            let known: HashSet<&str> = users.iter().map(|u| u.id.as_str()).collect();
            checks.insert(
                "orphaned_transactions".to_string(),
                CheckResult::from_findings(
                    CheckStatus::Warning,
                    transactions
                        .iter()
                        .filter(|t| !known.contains(t.user_id.as_str()))
                        .map(|t| json!({"transaction_id": t.id, "user_id": t.user_id}))
                        .collect(),
                    "No orphaned transactions found",
                    |n| format!("{} transaction(s) reference missing users", n),
                ),
            );
        }

        if let Some(users) = &users {
            let stale = session
                .filter(|s| !users.iter().any(|u| u.id == s.id))
                .map(|s| vec![json!({"user_id": s.id})])
                .unwrap_or_default();
            checks.insert(
                "session_user".to_string(),
                CheckResult::from_findings(
                    CheckStatus::Warning,
                    stale,
                    "Session is empty or points at a known user",
                    |_| "Session points at a user that does not exist".to_string(),
                ),
            );
        }

        let passed = checks.values().filter(|c| c.status == CheckStatus::Pass).count() as i64;
        let warnings = checks.values().filter(|c| c.status == CheckStatus::Warning).count() as i64;
        let errors = checks.values().filter(|c| c.status == CheckStatus::Error).count() as i64;

        Ok(DoctorResult {
            checks,
            summary: DoctorSummary { passed, warnings, errors },
        })
    }
}

/// Values that occur more than once, with their counts, sorted by value
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut dups: Vec<(&str, usize)> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    dups.sort();
    dups
}

#[derive(Debug, Serialize)]
pub struct DoctorResult {
    pub checks: BTreeMap<String, CheckResult>,
    pub summary: DoctorSummary,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

impl CheckResult {
    fn from_findings(
        failure: CheckStatus,
        findings: Vec<serde_json::Value>,
        pass_message: &str,
        fail_message: impl Fn(usize) -> String,
    ) -> Self {
        if findings.is_empty() {
            Self {
                status: CheckStatus::Pass,
                message: pass_message.to_string(),
                details: None,
            }
        } else {
            Self {
                status: failure,
                message: fail_message(findings.len()),
                details: Some(findings),
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub passed: i64,
    pub warnings: i64,
    pub errors: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::ports::KeyValueStore;
    use crate::services::collections::{CorruptDataPolicy, DEFAULT_NAMESPACE};

    fn doctor() -> (Arc<MemoryStore>, DoctorService) {
        let store = Arc::new(MemoryStore::new());
        let collections = Collections::new(store.clone(), DEFAULT_NAMESPACE, CorruptDataPolicy::Fail);
        (store, DoctorService::new(Arc::new(collections)))
    }

    const USERS: &str = r#"[
        {"id":"u1","username":"alice","passwordHash":"h","createdAt":"2025-01-01T00:00:00Z"}
    ]"#;

    #[test]
    fn test_empty_store_passes() {
        let (_, doctor) = doctor();
        let result = doctor.run_checks().unwrap();
        assert_eq!(result.summary.errors, 0);
        assert_eq!(result.summary.warnings, 0);
        assert!(result.checks.contains_key("orphaned_transactions"));
    }

    #[test]
    fn test_orphans_and_unlisted_categories() {
        let (store, doctor) = doctor();
        store.set("wenli_wallet_users", USERS).unwrap();
        store
            .set(
                "wenli_wallet_transactions",
                r#"[
                {"id":"t1","userId":"u1","type":"expense","category":"餐饮","amount":5,
                 "date":"2025-01-02","note":"","createdAt":"2025-01-02T00:00:00Z"},
                {"id":"t2","userId":"ghost","type":"income","category":"Lottery","amount":5,
                 "date":"2025-01-02","note":"","createdAt":"2025-01-02T00:00:00Z"}
            ]"#,
            )
            .unwrap();
        store.set("wenli_wallet_session", r#"{"id":"ghost","username":"g"}"#).unwrap();

        let result = doctor.run_checks().unwrap();
        assert_eq!(result.checks["orphaned_transactions"].status, CheckStatus::Warning);
        assert_eq!(result.checks["unlisted_categories"].status, CheckStatus::Warning);
        assert_eq!(result.checks["session_user"].status, CheckStatus::Warning);
        assert_eq!(result.checks["duplicate_transaction_ids"].status, CheckStatus::Pass);
        assert_eq!(result.summary.errors, 0);
    }

    #[test]
    fn test_corrupt_collection_is_reported_not_raised() {
        let (store, doctor) = doctor();
        store.set("wenli_wallet_users", USERS).unwrap();
        store.set("wenli_wallet_transactions", "[{").unwrap();

        let result = doctor.run_checks().unwrap();
        assert_eq!(result.checks["corrupt_data"].status, CheckStatus::Error);
        assert!(!result.checks.contains_key("orphaned_transactions"));
        assert_eq!(result.checks["duplicate_usernames"].status, CheckStatus::Pass);
    }

    #[test]
    fn test_duplicates_helper() {
        let dups = duplicates(["a", "b", "a", "c", "b", "a"].into_iter());
        assert_eq!(dups, vec![("a", 3), ("b", 2)]);
    }
}
