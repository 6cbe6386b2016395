//! Bounded admission control.
//!
//! At most `max_concurrent` requests execute at once; the rest wait in a
//! strict FIFO queue with a per-request admission deadline. The queue is
//! the fair semaphore's internal waiter list — dropping a timed-out
//! acquire future removes the waiter, so a queue timeout cannot leak a
//! queue slot or a permit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::{Instant, timeout};
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::stats::StatsCollector;

#[cfg(feature = "metrics")]
use crate::metrics::QUEUE_TIMEOUT_COUNTER;

/// FIFO admission gate bounding concurrent execution.
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    queue_timeout: Duration,
    stats: Arc<StatsCollector>,
}

impl ConcurrencyGate {
    /// Creates a gate admitting up to `max_concurrent` requests at once.
    pub fn new(max_concurrent: usize, queue_timeout: Duration, stats: Arc<StatsCollector>) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            queue_timeout,
            stats,
        }
    }

    /// Admits the caller, queueing when the gate is saturated.
    ///
    /// Fails with [`RequestError::QueueTimeout`] when the admission
    /// deadline elapses first. The returned permit releases the slot on
    /// drop, which also admits the queue head, if any.
    pub async fn admit(&self) -> Result<GatePermit, RequestError> {
        // Fast path: a free slot, no queueing.
        if let Ok(permit) = Arc::clone(&self.semaphore).try_acquire_owned() {
            return Ok(self.into_permit(permit));
        }

        self.stats.record_enqueued();
        let enqueued_at = Instant::now();
        let acquired = timeout(
            self.queue_timeout,
            Arc::clone(&self.semaphore).acquire_owned(),
        )
        .await;
        self.stats.record_dequeued();

        match acquired {
            Ok(Ok(permit)) => {
                debug!(waited_ms = enqueued_at.elapsed().as_millis() as u64, "admitted from queue");
                Ok(self.into_permit(permit))
            }
            // The semaphore is never closed; an acquire error can only
            // mean shutdown, which this gate does not implement.
            Ok(Err(_)) => Err(RequestError::QueueTimeout {
                waited: enqueued_at.elapsed(),
            }),
            Err(_) => {
                warn!(waited_ms = self.queue_timeout.as_millis() as u64, "queue wait timed out");
                #[cfg(feature = "metrics")]
                metrics::counter!(*QUEUE_TIMEOUT_COUNTER).increment(1);
                Err(RequestError::QueueTimeout {
                    waited: self.queue_timeout,
                })
            }
        }
    }

    /// Number of free execution slots.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    fn into_permit(&self, permit: OwnedSemaphorePermit) -> GatePermit {
        self.stats.record_admitted();
        GatePermit {
            _permit: permit,
            stats: Arc::clone(&self.stats),
        }
    }
}

/// Admission token; holding it occupies one execution slot.
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
    stats: Arc<StatsCollector>,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.stats.record_released();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(limit: usize, queue_timeout: Duration) -> ConcurrencyGate {
        ConcurrencyGate::new(limit, queue_timeout, Arc::new(StatsCollector::new()))
    }

    #[tokio::test]
    async fn admits_up_to_the_limit() {
        let gate = gate(2, Duration::from_secs(1));
        let first = gate.admit().await.unwrap();
        let _second = gate.admit().await.unwrap();
        assert_eq!(gate.available(), 0);

        drop(first);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn queued_caller_times_out() {
        let gate = gate(1, Duration::from_millis(20));
        let _held = gate.admit().await.unwrap();

        let result = gate.admit().await;
        assert!(matches!(result, Err(RequestError::QueueTimeout { .. })));
        assert_eq!(gate.available(), 0, "timed-out waiter must not hold a slot");
    }

    #[tokio::test]
    async fn queued_caller_is_admitted_when_a_slot_frees() {
        let gate = Arc::new(gate(1, Duration::from_secs(5)));
        let held = gate.admit().await.unwrap();

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.admit().await.map(drop) })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(held);

        waiter.await.unwrap().unwrap();
    }
}
