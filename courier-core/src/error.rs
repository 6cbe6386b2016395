//! Error types for transport collaborators.

use thiserror::Error;

/// Error raised by a [`Transport`](crate::Transport) implementation.
///
/// All variants describe network-level failure of the exchange itself —
/// the class of error that is safe to retry. Protocol-level outcomes
/// (4xx/5xx statuses) are not transport errors; they arrive as regular
/// [`ClientResponse`](crate::ClientResponse) values.
///
/// Variants carry rendered messages rather than source errors: a
/// settlement is fanned out to every deduplicated caller, so errors must
/// be `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Name resolution failed.
    #[error("name resolution failed: {0}")]
    Dns(String),

    /// An I/O error occurred during the exchange.
    #[error("i/o failure: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io(err.to_string())
    }
}
