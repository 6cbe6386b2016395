//! Response snapshot type.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// An immutable snapshot of one HTTP exchange result.
///
/// `ClientResponse` owns its status, headers, and a fully buffered body.
/// Cloning is cheap: the body is [`Bytes`], so a clone shares the underlying
/// buffer by reference count. Because every field of a clone is either
/// independently owned or immutable, handing out clones is how the cache
/// serves defensive copies — no reader can reach back into the stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ClientResponse {
    /// Creates a response snapshot.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Creates a bodyless response with the given status and no headers.
    pub fn from_status(status: StatusCode) -> Self {
        Self::new(status, HeaderMap::new(), Bytes::new())
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the buffered body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Whether the status is in the 2xx class.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether the status is in the 4xx class.
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Whether the status is in the 5xx class.
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}
