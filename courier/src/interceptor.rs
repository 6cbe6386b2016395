//! Interceptor traits and the ordered chain applying them.
//!
//! Interceptors are the pluggable seam for cross-cutting request/response
//! concerns: auth headers, response rewriting, recovery. They run inside
//! each transport attempt, in registration order.
//!
//! Failure policy: an interceptor that errors is logged and skipped, never
//! aborting the pipeline. A failing request interceptor passes its input
//! descriptor through unchanged; a failing response interceptor leaves the
//! current outcome as it was.

use std::error::Error;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use courier_core::{ClientResponse, RequestDescriptor};
use tracing::warn;

use crate::error::RequestError;

/// Boxed error type interceptors may fail with.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Transforms an outgoing request before the transport call.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Returns the descriptor to use in place of `descriptor`.
    async fn intercept(&self, descriptor: RequestDescriptor)
    -> Result<RequestDescriptor, BoxError>;
}

/// Observes or rewrites the outcome of a transport attempt.
///
/// On success, `response` is the current response and `error` is `None`.
/// On failure, `response` is `None` and `error` carries the failure; an
/// interceptor may substitute a successful response by returning
/// `Ok(Some(response))` — cross-cutting recovery such as
/// refresh-auth-and-replay hooks in here. Returning `Ok(None)` leaves the
/// outcome unchanged.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    /// Inspects one settled attempt.
    async fn intercept(
        &self,
        response: Option<ClientResponse>,
        descriptor: &RequestDescriptor,
        error: Option<&RequestError>,
    ) -> Result<Option<ClientResponse>, BoxError>;
}

/// Ordered interceptor pipeline.
///
/// Registration is allowed after the client is built, so the vectors sit
/// behind an `RwLock`. The lock is released before any interceptor runs —
/// the chain is cloned out as `Arc`s — so no lock is ever held across an
/// await.
#[derive(Default)]
pub struct InterceptorChain {
    request: RwLock<Vec<Arc<dyn RequestInterceptor>>>,
    response: RwLock<Vec<Arc<dyn ResponseInterceptor>>>,
}

impl InterceptorChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request interceptor.
    pub fn add_request(&self, interceptor: Arc<dyn RequestInterceptor>) {
        self.request
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(interceptor);
    }

    /// Appends a response interceptor.
    pub fn add_response(&self, interceptor: Arc<dyn ResponseInterceptor>) {
        self.response
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(interceptor);
    }

    /// Runs the request pipeline, threading the descriptor through each
    /// interceptor in registration order.
    pub async fn apply_request(&self, mut descriptor: RequestDescriptor) -> RequestDescriptor {
        let chain: Vec<_> = self
            .request
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(Arc::clone)
            .collect();
        for interceptor in chain {
            match interceptor.intercept(descriptor.clone()).await {
                Ok(next) => descriptor = next,
                Err(error) => {
                    warn!(%error, "request interceptor failed, passing descriptor through");
                }
            }
        }
        descriptor
    }

    /// Runs the response pipeline over a settled attempt.
    ///
    /// Interceptors run on failures too; the first one to substitute a
    /// response flips the outcome to success for the rest of the chain.
    /// If nothing substitutes, the original error propagates.
    pub async fn apply_response(
        &self,
        outcome: Result<ClientResponse, RequestError>,
        descriptor: &RequestDescriptor,
    ) -> Result<ClientResponse, RequestError> {
        let chain: Vec<_> = self
            .response
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(Arc::clone)
            .collect();
        let mut outcome = outcome;
        for interceptor in chain {
            let (response, error) = match &outcome {
                Ok(response) => (Some(response.clone()), None),
                Err(error) => (None, Some(error)),
            };
            match interceptor.intercept(response, descriptor, error).await {
                Ok(Some(substituted)) => outcome = Ok(substituted),
                Ok(None) => {}
                Err(error) => {
                    warn!(%error, "response interceptor failed, keeping current outcome");
                }
            }
        }
        outcome
    }
}
