//! Requests are processed one at a time whatever the connection limit.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;

use common::{client, start_server, test_config};
use relay_dispatch::{Response, Route};

const CLIENTS: usize = 8;

#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    max: AtomicUsize,
    total: AtomicUsize,
}

fn slow_route(tracker: Arc<InFlight>) -> Route {
    Route::get("/slow", move |_| {
        let now = tracker.current.fetch_add(1, Ordering::SeqCst) + 1;
        tracker.max.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(25));
        tracker.current.fetch_sub(1, Ordering::SeqCst);
        tracker.total.fetch_add(1, Ordering::SeqCst);
        Ok(Response::text(200, "done"))
    })
}

async fn max_overlap(max_connections: Option<i64>) -> usize {
    let tracker = Arc::new(InFlight::default());
    let mut config = test_config();
    config.listener.max_connections = max_connections;
    let server = start_server(config, vec![slow_route(Arc::clone(&tracker))]).await;

    let url = server.url("/slow");
    let requests: Vec<_> = (0..CLIENTS)
        .map(|_| {
            let url = url.clone();
            tokio::spawn(async move { client().get(url).send().await.unwrap().status() })
        })
        .collect();

    for request in requests {
        assert_eq!(request.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(tracker.total.load(Ordering::SeqCst), CLIENTS);

    server.stop().await;
    tracker.max.load(Ordering::SeqCst)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_permit_serializes_requests() {
    assert_eq!(max_overlap(Some(1)).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_permits_still_serialize_requests() {
    assert_eq!(max_overlap(Some(4)).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unbounded_accepting_still_serializes_requests() {
    assert_eq!(max_overlap(None).await, 1);
}
