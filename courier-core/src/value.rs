//! Cached response values with expiration metadata.
//!
//! A [`CachedResponse`] wraps a [`ClientResponse`] with the absolute instant
//! at which it stops being servable. There is no stale tier: an entry is
//! either fresh or expired, and expired entries are treated as absent by
//! the cache.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::response::ClientResponse;

/// Freshness state of a cached entry.
#[derive(Debug, PartialEq, Eq)]
pub enum EntryState {
    /// The entry may be served.
    Fresh(CachedResponse),
    /// The entry is past its expiry instant and must not be served.
    Expired(CachedResponse),
}

/// A successful response stored in the cache, with its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    response: ClientResponse,
    expire: DateTime<Utc>,
}

impl CachedResponse {
    /// Wraps a response with an expiry of `now + ttl`.
    ///
    /// A TTL too large to represent saturates to the far future.
    pub fn new(response: ClientResponse, ttl: Duration) -> Self {
        let expire = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { response, expire }
    }

    /// Returns the stored response.
    pub fn response(&self) -> &ClientResponse {
        &self.response
    }

    /// Returns the absolute expiry instant.
    pub fn expire(&self) -> DateTime<Utc> {
        self.expire
    }

    /// Consumes the entry and returns the inner response.
    pub fn into_response(self) -> ClientResponse {
        self.response
    }

    /// Evaluates the entry against the current instant.
    pub fn state(self) -> EntryState {
        if self.expire <= Utc::now() {
            EntryState::Expired(self)
        } else {
            EntryState::Fresh(self)
        }
    }

    /// Whether the entry is past its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.expire <= Utc::now()
    }
}
