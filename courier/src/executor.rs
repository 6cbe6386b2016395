//! Per-request orchestration.
//!
//! One logical request moves through a fixed sequence of phases:
//!
//! ```text
//! Init → CacheCheck → Dedup → Attempting(n) → [Retrying → Attempting(n+1)]* → Settled
//! ```
//!
//! Each phase is one method below, and every suspension point — the
//! transport call, the per-attempt deadline, the backoff sleep — lives
//! inside a phase. Shared state (cache, pending table, stats) is only
//! touched between suspensions, never across one.
//!
//! Settlement bookkeeping happens exactly once per logical request on
//! every path: a cache hit settles without ever owning a pending entry,
//! an attached caller adopts the leader's settlement, and the leader
//! releases its pending entry whether it succeeded or failed.

use std::sync::Arc;

use courier_core::{ClientResponse, RequestDescriptor, Transport};
use tokio::time::{sleep, timeout};
use tracing::{Instrument, debug, info_span};

use crate::cache::CacheStore;
use crate::config::ClientConfig;
use crate::dedup::{DedupDecision, PendingTable, recv_outcome};
use crate::error::RequestError;
use crate::interceptor::InterceptorChain;
use crate::retry::RetryPolicy;
use crate::stats::StatsCollector;

/// Orchestrates one logical request end-to-end.
pub(crate) struct RequestExecutor {
    transport: Arc<dyn Transport>,
    cache: Arc<CacheStore>,
    pending: Arc<PendingTable>,
    interceptors: Arc<InterceptorChain>,
    retry: RetryPolicy,
    stats: Arc<StatsCollector>,
    config: ClientConfig,
}

impl RequestExecutor {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        cache: Arc<CacheStore>,
        pending: Arc<PendingTable>,
        interceptors: Arc<InterceptorChain>,
        stats: Arc<StatsCollector>,
        config: ClientConfig,
    ) -> Self {
        let retry = RetryPolicy::new(config.retry_delay, config.retry_delay_multiplier);
        Self {
            transport,
            cache,
            pending,
            interceptors,
            retry,
            stats,
            config,
        }
    }

    /// Runs one logical request to settlement.
    pub(crate) async fn execute(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<ClientResponse, RequestError> {
        let span = info_span!(
            "request",
            method = %descriptor.method(),
            url = %descriptor.url(),
        );
        self.execute_inner(descriptor).instrument(span).await
    }

    async fn execute_inner(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<ClientResponse, RequestError> {
        let fingerprint = descriptor.fingerprint();
        let cacheable = self.config.enable_cache && descriptor.is_get_like();

        // CacheCheck: a hit short-circuits straight to settlement.
        if cacheable {
            if let Some(response) = self.cache.get(&fingerprint) {
                debug!(%fingerprint, "cache hit");
                self.stats.record_cache_hit();
                self.stats.record_settlement(true);
                return Ok(response);
            }
        }

        // Dedup: attach to an in-flight identical request, or lead one.
        let guard = if self.config.enable_deduplication {
            match self.pending.subscribe_or_register(&fingerprint) {
                DedupDecision::Attach(mut receiver) => {
                    let outcome = recv_outcome(receiver.recv().await);
                    self.stats.record_settlement(outcome.is_ok());
                    return outcome;
                }
                DedupDecision::Lead(guard) => Some(guard),
            }
        } else {
            None
        };

        // Attempting/Retrying until the attempt loop settles.
        let outcome = self.run_attempts(&descriptor).await;

        // Settled: cache write, pending release, stats — exactly once.
        if let Ok(response) = &outcome {
            if cacheable && response.is_success() {
                self.cache
                    .put(fingerprint, response.clone(), self.config.cache_ttl);
            }
        }
        if let Some(guard) = guard {
            guard.complete(outcome.clone());
        }
        self.stats.record_settlement(outcome.is_ok());
        outcome
    }

    /// The attempt loop: one transport exchange per attempt, backoff
    /// between retries.
    async fn run_attempts(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<ClientResponse, RequestError> {
        let mut attempt: u32 = 1;
        loop {
            match self.attempt_once(descriptor).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    if self.config.enable_retry
                        && self
                            .retry
                            .should_retry(&error, attempt, self.config.max_retries)
                    {
                        let delay = self.retry.delay_for(attempt);
                        debug!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            %error,
                            "retrying after backoff",
                        );
                        self.stats.record_retry();
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    // A retryable error that lands here ran out of budget.
                    return Err(if self.config.enable_retry && error.is_retryable() {
                        RequestError::RetriesExhausted {
                            attempts: attempt,
                            source: Box::new(error),
                        }
                    } else {
                        error
                    });
                }
            }
        }
    }

    /// One attempt: request interceptors, the deadline-bounded transport
    /// exchange, status classification, response interceptors.
    async fn attempt_once(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<ClientResponse, RequestError> {
        let prepared = self.interceptors.apply_request(descriptor.clone()).await;
        let deadline = prepared.timeout().unwrap_or(self.config.timeout);

        let outcome = match timeout(deadline, self.transport.send(&prepared)).await {
            Ok(Ok(response)) => match RequestError::from_status(response.status()) {
                Some(error) => Err(error),
                None => Ok(response),
            },
            Ok(Err(transport_error)) => Err(RequestError::Network(transport_error)),
            // The elapsed deadline dropped the in-flight exchange.
            Err(_) => Err(RequestError::Timeout { elapsed: deadline }),
        };

        self.interceptors.apply_response(outcome, &prepared).await
    }
}
