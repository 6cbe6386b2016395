//! The transport seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::descriptor::RequestDescriptor;
use crate::error::TransportError;
use crate::response::ClientResponse;

/// Trait for performing one network exchange.
///
/// This is the external collaborator boundary: the orchestrator never
/// assumes a specific protocol library, it only requires that the returned
/// status code allows 2xx/4xx/5xx discrimination and that the future is
/// cancel-safe. The per-attempt deadline is enforced by the caller wrapping
/// `send` in `tokio::time::timeout`, which drops (and thereby aborts) the
/// in-flight exchange.
///
/// # Examples
///
/// ```rust,ignore
/// struct StaticTransport {
///     response: ClientResponse,
/// }
///
/// #[async_trait]
/// impl Transport for StaticTransport {
///     async fn send(&self, _request: &RequestDescriptor) -> Result<ClientResponse, TransportError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one exchange for the given request.
    async fn send(&self, request: &RequestDescriptor) -> Result<ClientResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, request: &RequestDescriptor) -> Result<ClientResponse, TransportError> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &RequestDescriptor) -> Result<ClientResponse, TransportError> {
        (**self).send(request).await
    }
}
