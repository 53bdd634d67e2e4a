//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation and aggregation logic - no I/O or external dependencies.

pub mod category;
pub mod result;
pub mod statistics;
mod transaction;
mod user;

pub use category::{Category, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use statistics::{CategoryTotal, DailyTrend, Overview, Totals};
pub use transaction::{
    NewTransaction, Transaction, TransactionFilter, TransactionPatch, TransactionType, MAX_AMOUNT,
};
pub use user::{Session, User, UserRecord};
