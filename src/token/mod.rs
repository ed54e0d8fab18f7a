//! Session token storage.

pub mod cookies;

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Access and refresh token issued together by the API.
///
/// The pair is only ever written or cleared as a unit; there is no way to
/// replace one half without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    access_token: String,
    refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        TokenPair {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

/// Shared view of the current token pair.
///
/// The client reads it again on every dispatch, so a store handed to several
/// components always feeds them the freshest credentials.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<TokenPair>;
    fn set(&self, pair: TokenPair);
    fn clear(&self);
}

struct StoredPair {
    pair: TokenPair,
    expires_at: DateTime<Utc>,
}

/// In-memory store with the same lifetime rules as the persisted cookies:
/// a pair older than the configured lifetime reads back as absent.
pub struct MemoryTokenStore {
    ttl: Duration,
    slot: Mutex<Option<StoredPair>>,
}

impl MemoryTokenStore {
    pub fn new(ttl: Duration) -> Self {
        MemoryTokenStore {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Store pre-seeded with `pair`, as when rebuilding a session from
    /// request cookies.
    pub fn with_pair(ttl: Duration, pair: TokenPair) -> Self {
        let store = MemoryTokenStore::new(ttl);
        store.set(pair);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<TokenPair> {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match &*slot {
            Some(stored) if stored.expires_at > Utc::now() => Some(stored.pair.clone()),
            Some(_) => {
                *slot = None;
                None
            }
            None => None,
        }
    }

    fn set(&self, pair: TokenPair) {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(StoredPair {
            pair,
            expires_at: Utc::now() + self.ttl,
        });
    }

    fn clear(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }
}
