//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB and in-memory maps for the KeyValueStore port
//! - Argon2id for the CredentialHasher port
//! - UUID and sequential counters for the IdGenerator port
//! - System and fixed clocks for the Clock port

pub mod argon2;
pub mod clock;
pub mod duckdb;
pub mod ids;
pub mod memory;

pub use self::argon2::Argon2Hasher;
pub use self::clock::{FixedClock, SystemClock};
pub use self::duckdb::DuckDbStore;
pub use self::ids::{SequentialIds, UuidGenerator};
pub use self::memory::MemoryStore;
