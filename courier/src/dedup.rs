//! In-flight request table for deduplication.
//!
//! Concurrent requests with the same fingerprint collapse onto one
//! transport call. The first caller to reach the table becomes the leader
//! and runs the call; everyone else attaches a receiver and awaits the
//! leader's settlement. The check-and-register step goes through the
//! map's entry API, so there is no window in which two callers can both
//! miss each other and both become leaders.
//!
//! Release is owned by [`PendingGuard`]: completing the guard removes the
//! entry and fans the outcome out, and a guard dropped without completion
//! (leader future cancelled mid-flight) still removes the entry, waking
//! waiters with a closed channel instead of leaving them hung.

use std::sync::Arc;

use courier_core::{ClientResponse, Fingerprint};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::RequestError;

/// What every caller of a shared in-flight request observes.
pub type SharedOutcome = Result<ClientResponse, RequestError>;

type Entries = Arc<DashMap<Fingerprint, broadcast::Sender<SharedOutcome>>>;

/// Decision for one caller arriving at the table.
pub enum DedupDecision {
    /// No in-flight request for this fingerprint existed; the caller is
    /// now registered as the leader and must run the transport call.
    Lead(PendingGuard),
    /// An in-flight request exists; await its settlement on this receiver.
    Attach(broadcast::Receiver<SharedOutcome>),
}

/// Table of in-flight requests keyed by fingerprint.
///
/// At most one live entry exists per fingerprint at any instant.
pub struct PendingTable {
    entries: Entries,
}

impl PendingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Attaches to an existing in-flight request, or atomically registers
    /// the caller as leader.
    pub fn subscribe_or_register(&self, key: &Fingerprint) -> DedupDecision {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(entry) => {
                debug!(%key, "attaching to in-flight request");
                DedupDecision::Attach(entry.get().subscribe())
            }
            Entry::Vacant(slot) => {
                // Capacity 1: the protocol sends exactly once per entry.
                let (sender, _receiver) = broadcast::channel(1);
                slot.insert(sender.clone());
                DedupDecision::Lead(PendingGuard {
                    key: key.clone(),
                    sender,
                    entries: Arc::clone(&self.entries),
                    completed: false,
                })
            }
        }
    }

    /// Number of in-flight entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no request is in flight.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PendingTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Leader-side handle to a registered in-flight entry.
///
/// The guard ensures the table invariant: the entry is removed exactly
/// once, whether the leader settles normally or its future is dropped.
pub struct PendingGuard {
    key: Fingerprint,
    sender: broadcast::Sender<SharedOutcome>,
    entries: Entries,
    completed: bool,
}

impl PendingGuard {
    /// Settles the in-flight request, waking every attached caller.
    ///
    /// The entry is removed before the send: a caller that attached just
    /// before removal holds a receiver and gets the outcome; a caller
    /// arriving after removal becomes the next leader.
    pub fn complete(mut self, outcome: SharedOutcome) {
        self.entries.remove(&self.key);
        self.completed = true;
        // No receivers is fine: nobody attached to this call.
        let _ = self.sender.send(outcome);
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if !self.completed {
            // Leader dropped mid-flight; dropping the sender wakes
            // waiters with a closed channel.
            self.entries.remove(&self.key);
        }
    }
}

/// Maps a broadcast receive result to the shared outcome.
///
/// A closed channel means the leader was dropped before settling.
pub fn recv_outcome(
    result: Result<SharedOutcome, broadcast::error::RecvError>,
) -> SharedOutcome {
    match result {
        Ok(outcome) => outcome,
        Err(_) => Err(RequestError::Dedup),
    }
}
