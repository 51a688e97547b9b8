//! Request/response correlation identifiers.

use std::sync::atomic::{AtomicI64, Ordering};

/// Identifier correlating a response to its originating request.
///
/// An id must never be reused concurrently for different in-flight
/// operations; [`TransactionIdGenerator`] guarantees this within a process.
pub type TransactionId = i64;

/// Monotonic in-process generator of transaction identifiers.
#[derive(Debug)]
pub struct TransactionIdGenerator(AtomicI64);

impl TransactionIdGenerator {
    /// Creates a generator starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicI64::new(1))
    }

    /// Creates a generator starting at the given id.
    #[must_use]
    pub const fn starting_at(first: TransactionId) -> Self {
        Self(AtomicI64::new(first))
    }

    /// Allocates the next identifier.
    pub fn next_id(&self) -> TransactionId {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for TransactionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_ascending() {
        let generator = TransactionIdGenerator::new();
        let a = generator.next_id();
        let b = generator.next_id();
        let c = generator.next_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_starting_at() {
        let generator = TransactionIdGenerator::starting_at(100);
        assert_eq!(generator.next_id(), 100);
        assert_eq!(generator.next_id(), 101);
    }
}
