#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Bounded response cache with TTL expiry and FIFO eviction.
///
/// [`CacheStore`](cache::CacheStore) treats expired entries as absent,
/// evicts the oldest-inserted entry at capacity, and hands every reader an
/// independent copy of the stored response.
pub mod cache;

/// The public [`Client`](client::Client) surface and its builder.
pub mod client;

/// Client configuration with serde support and humantime durations.
pub mod config;

/// In-flight request table for deduplication.
///
/// Concurrent identical requests share one transport call: the first
/// caller leads, everyone else attaches to the shared settlement via
/// [`PendingTable`](dedup::PendingTable).
pub mod dedup;

/// Error types for request orchestration.
///
/// Defines [`RequestError`] covering transport failures, per-attempt
/// timeouts, status classes, queue timeouts, and retry exhaustion.
pub mod error;

mod executor;

/// Bounded admission control.
///
/// [`ConcurrencyGate`](gate::ConcurrencyGate) limits how many requests
/// execute at once, queueing the rest FIFO with a queue-wait deadline.
pub mod gate;

/// Interceptor traits and the ordered chain applying them.
pub mod interceptor;

/// Metrics collection for request observability.
///
/// When the `metrics` feature is enabled, this module provides counters
/// and gauges for request outcomes, cache hits, retries, and admission
/// queue depth.
pub mod metrics;

/// Retry decisions and exponential backoff with jitter.
pub mod retry;

/// Request statistics: counters, gauges, and snapshots.
pub mod stats;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::RequestError;
pub use interceptor::{BoxError, RequestInterceptor, ResponseInterceptor};
pub use retry::RetryPolicy;
pub use stats::Stats;

pub use courier_core::{
    CachedResponse, ClientResponse, EntryState, Fingerprint, RequestDescriptor,
    RequestDescriptorBuilder, Transport, TransportError,
};

/// The `courier` prelude.
///
/// Provides convenient access to the most commonly used types:
///
/// ```rust
/// use courier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Client, ClientConfig, ClientResponse, RequestDescriptor, RequestError, Transport,
    };
}
