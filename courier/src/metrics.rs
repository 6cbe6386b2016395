//! Metrics declaration and initialization.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    // Request outcome metrics

    /// Track number of settled requests.
    pub static ref REQUESTS_TOTAL_COUNTER: &'static str = {
        metrics::describe_counter!(
            "courier_requests_total",
            "Total number of settled requests."
        );
        "courier_requests_total"
    };
    /// Track number of successfully settled requests.
    pub static ref REQUESTS_SUCCESS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "courier_requests_success_total",
            "Total number of requests settled successfully."
        );
        "courier_requests_success_total"
    };
    /// Track number of failed requests.
    pub static ref REQUESTS_FAILED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "courier_requests_failed_total",
            "Total number of requests settled with an error."
        );
        "courier_requests_failed_total"
    };
    /// Track number of cache hit events.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "courier_cache_hit_total",
            "Total number of requests served from cache."
        );
        "courier_cache_hit_total"
    };
    /// Track number of retries.
    pub static ref RETRIES_COUNTER: &'static str = {
        metrics::describe_counter!(
            "courier_retries_total",
            "Total number of retry attempts."
        );
        "courier_retries_total"
    };

    // Admission metrics

    /// Gauge of currently executing requests.
    pub static ref ACTIVE_REQUESTS_GAUGE: &'static str = {
        metrics::describe_gauge!(
            "courier_active_requests",
            "Number of requests currently executing."
        );
        "courier_active_requests"
    };
    /// Gauge of requests waiting for admission.
    pub static ref QUEUED_REQUESTS_GAUGE: &'static str = {
        metrics::describe_gauge!(
            "courier_queued_requests",
            "Number of requests waiting in the admission queue."
        );
        "courier_queued_requests"
    };
    /// Track number of queue-wait timeouts.
    pub static ref QUEUE_TIMEOUT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "courier_queue_timeout_total",
            "Total number of requests that timed out waiting for admission."
        );
        "courier_queue_timeout_total"
    };
}
