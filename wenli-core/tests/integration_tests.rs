//! Integration tests for wenli-core services
//!
//! These tests exercise the wired `WalletContext` against a real DuckDB file.
//! Ids and time are injected so results are deterministic.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tempfile::TempDir;

use wenli_core::adapters::{Argon2Hasher, DuckDbStore, FixedClock, SequentialIds};
use wenli_core::config::Config;
use wenli_core::ports::KeyValueStore;
use wenli_core::services::CheckStatus;
use wenli_core::{
    Error, NewTransaction, Session, Transaction, TransactionFilter, TransactionPatch, TransactionType,
    WalletContext, WALLET_DB_FILENAME,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Today, as seen by every test context
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
}

fn days_ago(n: i64) -> NaiveDate {
    today() - Duration::days(n)
}

/// Open a DuckDB-backed store in the temp dir
fn open_store(temp_dir: &TempDir) -> Arc<DuckDbStore> {
    let db_path = temp_dir.path().join(WALLET_DB_FILENAME);
    Arc::new(DuckDbStore::new(&db_path).expect("Failed to open store"))
}

/// Wire a context over `store` with cheap hashing and a fixed clock
fn context_with(store: Arc<DuckDbStore>, config: Config) -> WalletContext {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap())
        .ticking(Duration::seconds(1));
    WalletContext::with_parts(
        config,
        store,
        Arc::new(SequentialIds::new("id-")),
        Arc::new(clock),
        Arc::new(Argon2Hasher::with_params(8, 1, 1).unwrap()),
    )
}

fn create_context(temp_dir: &TempDir) -> WalletContext {
    context_with(open_store(temp_dir), Config::default())
}

fn register(ctx: &WalletContext, username: &str) -> Session {
    ctx.register(username, "secret")
        .unwrap()
        .expect("username should be free")
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_register_same_username_twice() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);

    assert!(ctx.identity.register("alice", "secret").unwrap().is_some());
    assert!(ctx.identity.register("alice", "other").unwrap().is_none());

    let raw = ctx.store.get("wenli_wallet_users").unwrap().unwrap();
    let users: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    let alices = users.iter().filter(|u| u["username"] == "alice").count();
    assert_eq!(alices, 1);
}

#[test]
fn test_login_returns_public_user_and_stores_hash_only() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);

    ctx.identity.register("alice", "secret").unwrap();
    let user = ctx.identity.login("alice", "secret").unwrap().unwrap();
    assert_eq!(user.username, "alice");

    let public = serde_json::to_value(&user).unwrap();
    assert!(public.get("passwordHash").is_none());
    assert!(public.get("password").is_none());

    let raw = ctx.store.get("wenli_wallet_users").unwrap().unwrap();
    assert!(!raw.contains("\"secret\""));
    assert!(raw.contains("$argon2id$"));

    assert!(ctx.identity.login("alice", "wrong").unwrap().is_none());
    assert!(ctx.identity.login("Alice", "secret").unwrap().is_none());
}

#[test]
fn test_register_and_login_set_the_session() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);

    let alice = register(&ctx, "alice");
    assert_eq!(ctx.current_session().unwrap(), Some(alice.clone()));

    ctx.logout().unwrap();
    assert_eq!(ctx.current_session().unwrap(), None);

    assert!(ctx.login("alice", "nope").unwrap().is_none());
    assert_eq!(ctx.current_session().unwrap(), None);

    let again = ctx.login("alice", "secret").unwrap().unwrap();
    assert_eq!(again, alice);

    // Lookups behind `wl register` and `wl whoami`
    assert!(ctx.identity.username_exists("alice").unwrap());
    assert!(!ctx.identity.username_exists("Alice").unwrap());
    let user = ctx.identity.find_user(&alice.id).unwrap().unwrap();
    assert_eq!(user.username, "alice");
    assert!(ctx.identity.find_user("ghost").unwrap().is_none());
}

// ============================================================================
// Ledger
// ============================================================================

#[test]
fn test_transactions_scoped_and_sorted() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let alice = register(&ctx, "alice");
    let bob = register(&ctx, "bob");

    let dates = [days_ago(3), days_ago(0), days_ago(10), days_ago(1)];
    for (i, date) in dates.iter().enumerate() {
        ctx.ledger
            .add(&alice, NewTransaction::expense("餐饮", Decimal::new(i as i64 + 1, 0), *date))
            .unwrap();
    }
    ctx.ledger
        .add(&bob, NewTransaction::income("工资", Decimal::new(500, 0), today()))
        .unwrap();

    let listed = ctx.ledger.transactions(&alice).unwrap();
    assert_eq!(listed.len(), 4);
    assert!(listed.iter().all(|t| t.user_id == alice.id));
    let listed_dates: Vec<NaiveDate> = listed.iter().map(|t| t.date).collect();
    assert_eq!(listed_dates, vec![days_ago(0), days_ago(1), days_ago(3), days_ago(10)]);

    assert_eq!(ctx.ledger.transactions(&bob).unwrap().len(), 1);
}

#[test]
fn test_update_changes_only_amount() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let alice = register(&ctx, "alice");

    let before = ctx
        .ledger
        .add(&alice, NewTransaction::expense("交通", Decimal::new(12, 0), days_ago(2)).with_note("taxi"))
        .unwrap();
    let after = ctx
        .ledger
        .update(&alice, &before.id, &TransactionPatch::amount(Decimal::new(50, 0)))
        .unwrap()
        .unwrap();

    assert_eq!(after.amount, Decimal::new(50, 0));
    assert_eq!(
        Transaction { amount: before.amount, ..after.clone() },
        before
    );
}

#[test]
fn test_delete_unknown_id_leaves_collection_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let alice = register(&ctx, "alice");

    let tx = ctx
        .ledger
        .add(&alice, NewTransaction::expense("购物", Decimal::new(30, 0), today()))
        .unwrap();

    let before = ctx.store.get("wenli_wallet_transactions").unwrap();
    assert!(!ctx.ledger.delete(&alice, "no-such-id").unwrap());
    assert_eq!(ctx.store.get("wenli_wallet_transactions").unwrap(), before);

    assert!(ctx.ledger.delete(&alice, &tx.id).unwrap());
    assert!(ctx.ledger.transactions(&alice).unwrap().is_empty());
}

#[test]
fn test_foreign_records_behave_as_missing() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let alice = register(&ctx, "alice");
    let mallory = register(&ctx, "mallory");

    let tx = ctx
        .ledger
        .add(&alice, NewTransaction::expense("医疗", Decimal::new(80, 0), today()))
        .unwrap();

    assert!(ctx.ledger.get(&mallory, &tx.id).unwrap().is_none());
    assert!(ctx
        .ledger
        .update(&mallory, &tx.id, &TransactionPatch::amount(Decimal::ZERO))
        .unwrap()
        .is_none());
    assert!(!ctx.ledger.delete(&mallory, &tx.id).unwrap());

    let untouched = ctx.ledger.get(&alice, &tx.id).unwrap().unwrap();
    assert_eq!(untouched.amount, Decimal::new(80, 0));
}

#[test]
fn test_search_by_type_and_text() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let alice = register(&ctx, "alice");

    ctx.ledger
        .add(&alice, NewTransaction::expense("餐饮", Decimal::new(25, 0), today()).with_note("Hotpot dinner"))
        .unwrap();
    ctx.ledger
        .add(&alice, NewTransaction::income("红包", Decimal::new(200, 0), days_ago(1)))
        .unwrap();

    let hits = ctx
        .ledger
        .search(&alice, &TransactionFilter::default().search("hotpot"))
        .unwrap();
    assert_eq!(hits.len(), 1);

    let by_category = ctx
        .ledger
        .search(&alice, &TransactionFilter::default().search("红包"))
        .unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].kind, TransactionType::Income);

    let expenses = ctx
        .ledger
        .search(&alice, &TransactionFilter::default().kind(TransactionType::Expense))
        .unwrap();
    assert_eq!(expenses.len(), 1);
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_overview_totals_breakdown_and_trend() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let alice = register(&ctx, "alice");

    ctx.ledger
        .add(&alice, NewTransaction::income("工资", Decimal::new(100, 0), days_ago(30)))
        .unwrap();
    ctx.ledger
        .add(&alice, NewTransaction::expense("餐饮", Decimal::new(40, 0), days_ago(9)))
        .unwrap();
    ctx.ledger
        .add(&alice, NewTransaction::expense("交通", Decimal::new(10, 0), days_ago(8)))
        .unwrap();

    let overview = ctx.statistics.overview(&alice).unwrap();
    assert_eq!(overview.totals.income, Decimal::new(100, 0));
    assert_eq!(overview.totals.expense, Decimal::new(50, 0));
    assert_eq!(overview.totals.balance, Decimal::new(50, 0));

    let mut breakdown: Vec<(String, Decimal)> = overview
        .categories
        .iter()
        .map(|c| (c.category.clone(), c.amount))
        .collect();
    breakdown.sort();
    let mut expected = vec![
        ("交通".to_string(), Decimal::new(10, 0)),
        ("餐饮".to_string(), Decimal::new(40, 0)),
    ];
    expected.sort();
    assert_eq!(breakdown, expected);

    // Everything is older than the window
    assert_eq!(overview.trend.len(), 7);
    assert!(overview.trend.iter().all(|d| d.income.is_zero() && d.expense.is_zero()));
}

#[test]
fn test_trend_with_one_expense_today() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let alice = register(&ctx, "alice");

    ctx.ledger
        .add(&alice, NewTransaction::expense("娱乐", Decimal::new(20, 0), today()))
        .unwrap();

    assert_eq!(ctx.today(), today());
    let trend = ctx.statistics.daily_trend(&alice).unwrap();
    assert_eq!(trend.len(), 7);
    assert_eq!(trend[0].date, days_ago(6));
    assert!(trend[..6].iter().all(|d| d.expense.is_zero() && d.income.is_zero()));
    assert_eq!(trend[6].date, today());
    assert_eq!(trend[6].expense, Decimal::new(20, 0));
    assert_eq!(trend[6].label, "03/20");
}

#[test]
fn test_configured_trend_window() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        trend_days: 30,
        ..Config::default()
    };
    let ctx = context_with(open_store(&temp_dir), config);
    let alice = register(&ctx, "alice");

    assert_eq!(ctx.statistics.daily_trend(&alice).unwrap().len(), 30);
}

#[test]
fn test_oversized_amounts_are_errors_not_crashes() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let alice = register(&ctx, "alice");
    let huge = Decimal::from_scientific("5e28").unwrap();

    let rejected = ctx.ledger.add(&alice, NewTransaction::income("工资", huge, today()));
    assert!(matches!(rejected, Err(Error::Validation(_))));

    // Values written by something other than the ledger skip validation
    let record = |id: &str| {
        format!(
            r#"{{"id":"{}","userId":"{}","type":"income","category":"工资","amount":5e28,"date":"2025-03-20","createdAt":"2025-03-20T10:00:00Z"}}"#,
            id, alice.id
        )
    };
    ctx.store
        .set("wenli_wallet_transactions", &format!("[{},{}]", record("a"), record("b")))
        .unwrap();
    assert_eq!(ctx.ledger.transactions(&alice).unwrap().len(), 2);
    assert!(matches!(ctx.statistics.overview(&alice), Err(Error::Validation(_))));
}

#[test]
fn test_trend_window_past_calendar_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        trend_days: 200_000_000,
        ..Config::default()
    };
    let ctx = context_with(open_store(&temp_dir), config);
    let alice = register(&ctx, "alice");

    assert!(matches!(ctx.statistics.daily_trend(&alice), Err(Error::Validation(_))));
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_store_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let alice;
    {
        let ctx = create_context(&temp_dir);
        alice = register(&ctx, "alice");
        ctx.ledger
            .add(&alice, NewTransaction::expense("住房", Decimal::new(1500, 0), today()))
            .unwrap();
    }

    let ctx = create_context(&temp_dir);
    assert_eq!(ctx.current_session().unwrap(), Some(alice.clone()));
    let listed = ctx.ledger.transactions(&alice).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount, Decimal::new(1500, 0));
    assert!(ctx.identity.login("alice", "secret").unwrap().is_some());
}

#[test]
fn test_migrations_are_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);

    let second = store.run_migrations().unwrap();
    assert!(second.applied.is_empty());
    store.ensure_schema().unwrap();
}

#[test]
fn test_namespaces_do_not_collide() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);

    let a = context_with(store.clone(), Config::default());
    let b = context_with(
        store,
        Config {
            namespace: "sandbox".to_string(),
            ..Config::default()
        },
    );

    register(&a, "alice");
    assert_eq!(b.identity.user_count().unwrap(), 0);
    assert!(b.identity.register("alice", "secret").unwrap().is_some());
}

// ============================================================================
// Corrupt data
// ============================================================================

#[test]
fn test_corrupt_data_strict_and_lenient() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);
    store.set("wenli_wallet_transactions", "{definitely not json").unwrap();

    let strict = context_with(store.clone(), Config::default());
    let session = Session::new("u-1", "alice");
    match strict.ledger.transactions(&session) {
        Err(Error::CorruptData { key, .. }) => assert_eq!(key, "wenli_wallet_transactions"),
        other => panic!("expected CorruptData, got {:?}", other),
    }

    let lenient = context_with(
        store,
        Config {
            strict_storage: false,
            ..Config::default()
        },
    );
    assert!(lenient.ledger.transactions(&session).unwrap().is_empty());
    assert!(lenient.statistics.totals(&session).unwrap().balance.is_zero());
}

#[test]
fn test_doctor_reports_corrupt_and_orphaned_data() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_context(&temp_dir);
    let alice = register(&ctx, "alice");
    ctx.ledger
        .add(&alice, NewTransaction::expense("餐饮", Decimal::new(5, 0), today()))
        .unwrap();

    let healthy = ctx.doctor.run_checks().unwrap();
    assert_eq!(healthy.summary.errors, 0);
    assert_eq!(healthy.summary.warnings, 0);

    let ghost = Session::new("ghost", "ghost");
    ctx.ledger
        .add(&ghost, NewTransaction::expense("餐饮", Decimal::new(5, 0), today()))
        .unwrap();
    let orphaned = ctx.doctor.run_checks().unwrap();
    assert_eq!(orphaned.checks["orphaned_transactions"].status, CheckStatus::Warning);

    ctx.store.set("wenli_wallet_users", "not json").unwrap();
    let corrupt = ctx.doctor.run_checks().unwrap();
    assert_eq!(corrupt.checks["corrupt_data"].status, CheckStatus::Error);
    assert!(corrupt.summary.errors >= 1);
}

