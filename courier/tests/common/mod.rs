//! Shared mock transport for integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use courier::{ClientResponse, RequestDescriptor, Transport, TransportError};
use http::{HeaderMap, StatusCode};

/// One scripted transport outcome; consumed in order.
#[allow(dead_code)]
pub enum Script {
    /// Respond immediately with this status.
    Status(StatusCode),
    /// Fail immediately with this transport error.
    Fail(TransportError),
    /// Respond with this status after a delay.
    DelayedStatus(Duration, StatusCode),
    /// Fail with this transport error after a delay.
    DelayedFail(Duration, TransportError),
}

/// Transport double with a scripted outcome queue and call accounting.
///
/// Once the script runs dry, every call answers 200 OK after the default
/// delay. Response bodies carry the 1-based call number (`call-3`) so
/// tests can assert which exchange produced a response.
pub struct MockTransport {
    script: Mutex<VecDeque<Script>>,
    default_delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    last_request: Mutex<Option<RequestDescriptor>>,
}

#[allow(dead_code)]
impl MockTransport {
    /// Always answers 200 OK immediately.
    pub fn ok() -> Self {
        Self::new(Vec::new(), Duration::ZERO)
    }

    /// Always answers 200 OK after `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self::new(Vec::new(), delay)
    }

    /// Consumes `script` in order, then falls back to immediate 200 OK.
    pub fn scripted(script: Vec<Script>) -> Self {
        Self::new(script, Duration::ZERO)
    }

    fn new(script: Vec<Script>, default_delay: Duration) -> Self {
        Self {
            script: Mutex::new(script.into()),
            default_delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Total number of `send` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of concurrently executing `send` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// The most recent request handed to the transport.
    pub fn last_request(&self) -> Option<RequestDescriptor> {
        self.last_request.lock().unwrap().clone()
    }
}

fn response(status: StatusCode, call: usize) -> ClientResponse {
    ClientResponse::new(status, HeaderMap::new(), format!("call-{call}"))
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ClientResponse, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let concurrent = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(concurrent, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let step = self.script.lock().unwrap().pop_front();
        let result = match step {
            Some(Script::Status(status)) => Ok(response(status, call)),
            Some(Script::Fail(error)) => Err(error),
            Some(Script::DelayedStatus(delay, status)) => {
                tokio::time::sleep(delay).await;
                Ok(response(status, call))
            }
            Some(Script::DelayedFail(delay, error)) => {
                tokio::time::sleep(delay).await;
                Err(error)
            }
            None => {
                if !self.default_delay.is_zero() {
                    tokio::time::sleep(self.default_delay).await;
                }
                Ok(response(StatusCode::OK, call))
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
