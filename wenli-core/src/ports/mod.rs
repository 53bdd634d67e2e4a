//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The services
//! depend only on these traits, not on concrete implementations.

mod clock;
mod credentials;
mod ids;
mod storage;

pub use clock::Clock;
pub use credentials::CredentialHasher;
pub use ids::IdGenerator;
pub use storage::KeyValueStore;
