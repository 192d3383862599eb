//! Keyspace Entry Module
//!
//! A keyspace slot plus its optional expiry deadline.

use std::time::{SystemTime, UNIX_EPOCH};

// == Slot ==
/// The value held by a key: a plain byte string or a list of byte strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

// == Entry ==
#[derive(Debug, Clone)]
pub struct Entry {
    pub slot: Slot,
    /// Deadline in Unix milliseconds, None = no expiration
    pub expires_at: Option<u64>,
}

impl Entry {
    /// Creates an entry that expires `ttl_seconds` from now, if given.
    ///
    /// Deadlines past `u64::MAX` milliseconds saturate, so a huge TTL means
    /// "practically never" rather than an overflow.
    pub fn new(slot: Slot, ttl_seconds: Option<u64>) -> Self {
        let expires_at =
            ttl_seconds.map(|ttl| now_ms().saturating_add(ttl.saturating_mul(1000)));

        Self { slot, expires_at }
    }

    /// Expired once the clock reaches the deadline.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| now_ms() >= deadline)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn bytes(value: &str) -> Slot {
        Slot::Bytes(value.as_bytes().to_vec())
    }

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = Entry::new(bytes("test_value"), None);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = Entry::new(Slot::List(vec![b"a".to_vec()]), Some(1));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = Entry::new(bytes("v"), Some(u64::MAX / 1000 + 1));

        assert_eq!(entry.expires_at, Some(u64::MAX));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = Entry {
            slot: bytes("test"),
            expires_at: Some(now_ms()),
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
