//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use relay_dispatch::net::ListenerError;
use relay_dispatch::{HttpServer, Route, ServerConfig, ServerState, Shutdown};

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub state: watch::Receiver<ServerState>,
    handle: JoinHandle<Result<(), ListenerError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    /// Trigger shutdown and return the final state.
    #[allow(dead_code)]
    pub async fn stop(self) -> ServerState {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
        let state = *self.state.borrow();
        state
    }
}

/// Config bound to `127.0.0.1:0`.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.port = 0;
    config
}

/// Bind `config` with `routes` and run it in the background.
pub async fn start_server(config: ServerConfig, routes: Vec<Route>) -> TestServer {
    let server = HttpServer::bind(&config, routes, None).await.unwrap();
    let addr = server.local_addr().unwrap();
    let state = server.state();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(shutdown.subscribe()));

    TestServer {
        addr,
        shutdown,
        state,
        handle,
    }
}

/// Client with redirects and connection pooling disabled.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
