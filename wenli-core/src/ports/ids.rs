//! Identifier generation port

/// Source of fresh record identifiers
///
/// Implementations must not hand out the same id twice for the lifetime
/// of a data directory.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}
