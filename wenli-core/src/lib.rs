//! Wenli Core - local data store and aggregation for a personal wallet
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (User, Session, Transaction) and pure aggregation
//! - **ports**: Trait definitions for external dependencies (KeyValueStore, Clock, ...)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, Argon2, UUID, ...)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;

use adapters::{Argon2Hasher, DuckDbStore, SystemClock, UuidGenerator};
use config::Config;
use ports::{Clock, CredentialHasher, IdGenerator, KeyValueStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    CategoryTotal, DailyTrend, NewTransaction, Overview, Session, Totals, Transaction,
    TransactionFilter, TransactionPatch, TransactionType, User,
};
pub use domain::result::{Error, OperationResult, Result};

/// File name of the wallet database inside the data directory
pub const WALLET_DB_FILENAME: &str = "wallet.duckdb";

/// Main context for wallet operations
///
/// This is the primary entry point for all business logic. It holds the
/// storage medium, configuration, and all services, which share one
/// `Collections` view of the store.
pub struct WalletContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub collections: Arc<Collections>,
    pub clock: Arc<dyn Clock>,
    pub identity: IdentityService,
    pub session: SessionService,
    pub ledger: Arc<LedgerService>,
    pub statistics: StatisticsService,
    pub doctor: DoctorService,
}

impl WalletContext {
    /// Open the wallet stored in `data_dir`, creating it if needed
    pub fn new(data_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let config = Config::load(data_dir)?;

        let db_path = data_dir.join(WALLET_DB_FILENAME);
        let store = DuckDbStore::new(&db_path)
            .with_context(|| format!("Failed to open {}", db_path.display()))?;

        tracing::debug!(path = %db_path.display(), namespace = %config.namespace, "wallet opened");

        Ok(Self::with_parts(
            config,
            Arc::new(store),
            Arc::new(UuidGenerator),
            Arc::new(SystemClock),
            Arc::new(Argon2Hasher::new()),
        ))
    }

    /// Wire services over explicit ports
    pub fn with_parts(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        let collections = Arc::new(Collections::new(
            Arc::clone(&store),
            config.namespace.clone(),
            config.corrupt_policy(),
        ));

        let identity = IdentityService::new(
            Arc::clone(&collections),
            Arc::clone(&ids),
            Arc::clone(&clock),
            hasher,
        );
        let session = SessionService::new(Arc::clone(&collections));
        let ledger = Arc::new(LedgerService::new(
            Arc::clone(&collections),
            ids,
            Arc::clone(&clock),
        ));
        let statistics = StatisticsService::new(Arc::clone(&ledger), Arc::clone(&clock), config.trend_days);
        let doctor = DoctorService::new(Arc::clone(&collections));

        Self {
            config,
            store,
            collections,
            clock,
            identity,
            session,
            ledger,
            statistics,
            doctor,
        }
    }

    /// Register and, on success, make the new user current
    pub fn register(&self, username: &str, password: &str) -> Result<Option<Session>> {
        match self.identity.register(username, password)? {
            Some(user) => Ok(Some(self.session.set_current_user(&user)?)),
            None => Ok(None),
        }
    }

    /// Check credentials and, on success, make the user current
    pub fn login(&self, username: &str, password: &str) -> Result<Option<Session>> {
        match self.identity.login(username, password)? {
            Some(user) => Ok(Some(self.session.set_current_user(&user)?)),
            None => Ok(None),
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.session.logout()
    }

    pub fn current_session(&self) -> Result<Option<Session>> {
        self.session.current_user()
    }

    /// Today's date as the injected clock sees it
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
