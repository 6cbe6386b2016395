//! The public client surface.

use std::sync::Arc;

use bytes::Bytes;
use courier_core::{ClientResponse, RequestDescriptor, Transport};
use http::Method;

use crate::cache::CacheStore;
use crate::config::ClientConfig;
use crate::dedup::PendingTable;
use crate::error::RequestError;
use crate::executor::RequestExecutor;
use crate::gate::ConcurrencyGate;
use crate::interceptor::{InterceptorChain, RequestInterceptor, ResponseInterceptor};
use crate::stats::{Stats, StatsCollector};

struct ClientInner {
    executor: RequestExecutor,
    gate: ConcurrencyGate,
    cache: Arc<CacheStore>,
    pending: Arc<PendingTable>,
    interceptors: Arc<InterceptorChain>,
    stats: Arc<StatsCollector>,
}

/// Request orchestration client.
///
/// Wraps a [`Transport`] collaborator with caching, deduplication, retry,
/// bounded concurrency, and interceptors. Cloning shares all state, so a
/// client can be handed to any number of tasks.
///
/// ```rust,ignore
/// let client = Client::builder(transport).build();
///
/// let users = client.get("https://api.example.com/users").await?;
/// let stats = client.stats();
/// assert_eq!(stats.total, stats.success + stats.failed);
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Creates a client over `transport` with default configuration.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::builder(transport).build()
    }

    /// Creates a builder over `transport`.
    pub fn builder(transport: impl Transport + 'static) -> ClientBuilder {
        ClientBuilder {
            transport: Arc::new(transport),
            config: ClientConfig::default(),
        }
    }

    /// Executes one logical request.
    ///
    /// The request first passes admission control (queueing when
    /// saturated), then the cache, the pending table, and the retrying
    /// transport exchange.
    pub async fn request(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<ClientResponse, RequestError> {
        let permit = match self.inner.gate.admit().await {
            Ok(permit) => permit,
            Err(error) => {
                // Never admitted: the request still settles, as a failure.
                self.inner.stats.record_settlement(false);
                return Err(error);
            }
        };
        let outcome = self.inner.executor.execute(descriptor).await;
        drop(permit);
        outcome
    }

    /// Convenience GET.
    pub async fn get(&self, url: impl Into<String>) -> Result<ClientResponse, RequestError> {
        self.request(RequestDescriptor::builder(Method::GET, url).build())
            .await
    }

    /// Convenience POST with a body.
    pub async fn post(
        &self,
        url: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Result<ClientResponse, RequestError> {
        self.request(
            RequestDescriptor::builder(Method::POST, url)
                .body(body)
                .build(),
        )
        .await
    }

    /// Convenience PUT with a body.
    pub async fn put(
        &self,
        url: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Result<ClientResponse, RequestError> {
        self.request(
            RequestDescriptor::builder(Method::PUT, url)
                .body(body)
                .build(),
        )
        .await
    }

    /// Convenience DELETE.
    pub async fn delete(&self, url: impl Into<String>) -> Result<ClientResponse, RequestError> {
        self.request(RequestDescriptor::builder(Method::DELETE, url).build())
            .await
    }

    /// Snapshots counters and gauges.
    pub fn stats(&self) -> Stats {
        self.inner
            .stats
            .snapshot(self.inner.cache.len(), self.inner.pending.len())
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Appends a request interceptor to the chain.
    pub fn add_request_interceptor(&self, interceptor: impl RequestInterceptor + 'static) {
        self.inner.interceptors.add_request(Arc::new(interceptor));
    }

    /// Appends a response interceptor to the chain.
    pub fn add_response_interceptor(&self, interceptor: impl ResponseInterceptor + 'static) {
        self.inner.interceptors.add_response(Arc::new(interceptor));
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl ClientBuilder {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Client {
        let stats = Arc::new(StatsCollector::new());
        let cache = Arc::new(CacheStore::new(self.config.max_cache_size));
        let pending = Arc::new(PendingTable::new());
        let interceptors = Arc::new(InterceptorChain::new());
        let gate = ConcurrencyGate::new(
            self.config.max_concurrent,
            self.config.queue_timeout,
            Arc::clone(&stats),
        );
        let executor = RequestExecutor::new(
            self.transport,
            Arc::clone(&cache),
            Arc::clone(&pending),
            Arc::clone(&interceptors),
            Arc::clone(&stats),
            self.config,
        );
        Client {
            inner: Arc::new(ClientInner {
                executor,
                gate,
                cache,
                pending,
                interceptors,
                stats,
            }),
        }
    }
}
