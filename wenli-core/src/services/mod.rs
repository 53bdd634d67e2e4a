//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! owns one concern: a storage collection, the session slot, aggregation,
//! schema migrations or the event log.

pub mod collections;
pub mod doctor;
mod identity;
mod ledger;
pub mod logging;
pub mod migration;
mod session;
mod statistics;

pub use collections::{Collections, CorruptDataPolicy, StorageKey, DEFAULT_NAMESPACE};
pub use doctor::{CheckResult, CheckStatus, DoctorResult, DoctorService, DoctorSummary};
pub use identity::IdentityService;
pub use ledger::LedgerService;
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use session::SessionService;
pub use statistics::StatisticsService;
