//! Revoked access tokens
//!
//! Logged-out tokens are remembered by `jti` until their natural expiry.

use dashmap::DashMap;

/// In-memory revocation list keyed by token id
#[derive(Debug, Default)]
pub struct RevocationList {
    /// jti → expiry (Unix seconds)
    entries: DashMap<String, i64>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: &str, expires_at: i64) {
        self.entries.insert(jti.to_string(), expires_at);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.entries.contains_key(jti)
    }

    /// Drop entries whose token would have expired anyway
    pub fn prune(&self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_and_prune() {
        let list = RevocationList::new();
        list.revoke("a", 100);
        list.revoke("b", 300);
        assert!(list.is_revoked("a"));
        assert!(!list.is_revoked("c"));

        assert_eq!(list.prune(200), 1);
        assert!(!list.is_revoked("a"));
        assert!(list.is_revoked("b"));
        assert_eq!(list.len(), 1);
    }
}
