//! Admission control through the full client surface.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::MockTransport;
use courier::{Client, ClientConfig, RequestError};
use futures::future::join_all;

fn client(transport: &Arc<MockTransport>, config: ClientConfig) -> Client {
    Client::builder(Arc::clone(transport)).config(config).build()
}

#[tokio::test]
async fn saturation_bounds_concurrent_transport_calls() {
    let transport = Arc::new(MockTransport::with_delay(Duration::from_millis(60)));
    let config = ClientConfig {
        max_concurrent: 2,
        queue_timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    let client = client(&transport, config);

    let callers = (0..6).map(|i| {
        let client = client.clone();
        async move { client.get(format!("https://api.example.com/{i}")).await }
    });
    for outcome in join_all(callers).await {
        outcome.unwrap();
    }

    assert_eq!(transport.calls(), 6);
    assert!(
        transport.max_in_flight() <= 2,
        "no more than max_concurrent transport calls at any instant, saw {}",
        transport.max_in_flight(),
    );

    let stats = client.stats();
    assert_eq!(stats.total, 6);
    assert_eq!(stats.success, 6);
    assert_eq!(stats.active_requests, 0);
    assert_eq!(stats.queue_length, 0);
}

#[tokio::test]
async fn queued_request_fails_with_queue_timeout() {
    let transport = Arc::new(MockTransport::with_delay(Duration::from_millis(150)));
    let config = ClientConfig {
        max_concurrent: 1,
        queue_timeout: Duration::from_millis(30),
        ..ClientConfig::default()
    };
    let client = client(&transport, config);

    let slow = {
        let client = client.clone();
        tokio::spawn(async move { client.get("https://api.example.com/a").await })
    };
    // Let the first request occupy the only slot before queueing the next.
    tokio::time::sleep(Duration::from_millis(10)).await;
    let queued = client.get("https://api.example.com/b").await;

    assert!(matches!(queued, Err(RequestError::QueueTimeout { .. })));
    slow.await.unwrap().unwrap();

    assert_eq!(transport.calls(), 1, "the queued request never reached the transport");
    let stats = client.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.queue_length, 0, "timed-out waiter left the queue");
    assert_eq!(stats.active_requests, 0);
}

#[tokio::test]
async fn queued_requests_are_admitted_in_submission_order() {
    let transport = Arc::new(MockTransport::with_delay(Duration::from_millis(30)));
    let config = ClientConfig {
        max_concurrent: 1,
        enable_cache: false,
        queue_timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    let client = client(&transport, config);
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for name in ["a", "b", "c"] {
        let client = client.clone();
        let order = Arc::clone(&order);
        handles.push(tokio::spawn(async move {
            client
                .get(format!("https://api.example.com/{name}"))
                .await
                .unwrap();
            order.lock().unwrap().push(name);
        }));
        // Stagger submissions so enqueue order is deterministic.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(*order.lock().unwrap(), ["a", "b", "c"]);
}
