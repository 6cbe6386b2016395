//! Error types for request orchestration.
//!
//! The taxonomy follows the class of the failure, because the class decides
//! the recovery policy:
//!
//! - [`RequestError::Network`] and [`RequestError::Server`] are retryable
//! - [`RequestError::Timeout`] is terminal for its attempt and never retried
//! - [`RequestError::Client`] is terminal — retrying a 4xx cannot help
//! - [`RequestError::QueueTimeout`] means the request was never admitted
//! - [`RequestError::RetriesExhausted`] wraps the last retryable failure
//!   once the retry budget is spent, carrying the attempt count
//!
//! Every variant is `Clone`: a settlement is broadcast to all deduplicated
//! callers of the same fingerprint.

use std::time::Duration;

use courier_core::TransportError;
use http::StatusCode;
use thiserror::Error;

/// Error returned to callers of the orchestration layer.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    /// Transport-level failure (connection refused, DNS, I/O). Retryable.
    #[error(transparent)]
    Network(#[from] TransportError),

    /// The attempt's deadline elapsed. Terminal for that attempt.
    #[error("attempt timed out after {elapsed:?}")]
    Timeout {
        /// The deadline that elapsed.
        elapsed: Duration,
    },

    /// The server answered with a 4xx status. Never retried.
    #[error("client error: {status}")]
    Client {
        /// The 4xx status code.
        status: StatusCode,
    },

    /// The server answered with a 5xx status. Retryable.
    #[error("server error: {status}")]
    Server {
        /// The 5xx status code.
        status: StatusCode,
    },

    /// The request waited in the admission queue past its deadline.
    #[error("queued for {waited:?} without being admitted")]
    QueueTimeout {
        /// How long the request waited before giving up.
        waited: Duration,
    },

    /// All attempts failed and the retry budget is spent.
    #[error("request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Total number of attempts made (initial attempt plus retries).
        attempts: u32,
        /// The failure of the final attempt.
        #[source]
        source: Box<RequestError>,
    },

    /// The in-flight request this caller attached to was dropped before
    /// settling.
    #[error("shared in-flight request was dropped before settling")]
    Dedup,
}

impl RequestError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Only transient classes qualify: transport failures and 5xx
    /// responses. A per-attempt timeout is terminal by policy — the
    /// deadline already bounded the caller's patience.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RequestError::Network(_) | RequestError::Server { .. })
    }

    /// Maps a response status to the matching error class, if any.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_client_error() {
            Some(RequestError::Client { status })
        } else if status.is_server_error() {
            Some(RequestError::Server { status })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classes() {
        assert!(RequestError::Network(TransportError::Connect("refused".into())).is_retryable());
        assert!(
            RequestError::Server {
                status: StatusCode::BAD_GATEWAY
            }
            .is_retryable()
        );

        assert!(
            !RequestError::Client {
                status: StatusCode::NOT_FOUND
            }
            .is_retryable()
        );
        assert!(
            !RequestError::Timeout {
                elapsed: Duration::from_secs(1)
            }
            .is_retryable()
        );
        assert!(
            !RequestError::QueueTimeout {
                waited: Duration::from_secs(30)
            }
            .is_retryable()
        );
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            RequestError::from_status(StatusCode::NOT_FOUND),
            Some(RequestError::Client { .. })
        ));
        assert!(matches!(
            RequestError::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            Some(RequestError::Server { .. })
        ));
        assert!(RequestError::from_status(StatusCode::OK).is_none());
    }
}
