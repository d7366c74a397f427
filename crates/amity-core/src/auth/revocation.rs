//! Revocation table for credentials invalidated before their natural expiry.

use dashmap::DashMap;
use tracing::{debug, info};

use super::jwt::JwtManager;

/// Tracks explicitly revoked credentials until their expiry.
///
/// Shared process-wide; implementations must tolerate concurrent callers.
pub trait RevocationGate: Send + Sync {
    /// Reject `token` until the unix timestamp `until`.
    fn revoke(&self, token: &str, until: i64);

    /// True iff `token` has an entry whose `until` is later than `now`.
    fn is_revoked(&self, token: &str, now: i64) -> bool;

    /// Drop every entry that is no longer in force at `now`. Returns the
    /// number removed.
    fn purge_expired(&self, now: i64) -> usize;
}

/// In-memory [`RevocationGate`] keyed by the SHA-256 of the token.
#[derive(Default)]
pub struct InMemoryRevocationGate {
    entries: DashMap<String, i64>,
}

impl InMemoryRevocationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RevocationGate for InMemoryRevocationGate {
    fn revoke(&self, token: &str, until: i64) {
        let key = JwtManager::hash_token(token);
        self.entries
            .entry(key)
            .and_modify(|existing| *existing = (*existing).max(until))
            .or_insert(until);
        info!(until, "Token revoked");
    }

    fn is_revoked(&self, token: &str, now: i64) -> bool {
        let key = JwtManager::hash_token(token);
        let Some(until) = self.entries.get(&key).map(|entry| *entry.value()) else {
            return false;
        };
        if until > now {
            return true;
        }
        // Lazy purge; re-check under the shard lock in case of a concurrent revoke.
        self.entries.remove_if(&key, |_, until| *until <= now);
        false
    }

    fn purge_expired(&self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, until| *until > now);
        let removed = before.saturating_sub(self.entries.len());
        debug!(removed, "Purged expired revocations");
        removed
    }
}
