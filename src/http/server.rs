//! HTTP server: the serialized accept loop.
//!
//! # Responsibilities
//! - Bind the listener once the dispatcher is assembled
//! - Accept connections through the permit gate
//! - Serve each connection's single request before accepting the next
//! - Publish lifecycle state and stop on shutdown
//!
//! # Design Decisions
//! - Connections are served inline by the accept loop, never spawned, so at
//!   most one request is processed at any instant regardless of the permit count
//! - HTTP/1.1 with keep-alive disabled: one request per connection
//! - Shutdown only interrupts the wait for the next connection
//! - Accept failures are logged and the loop continues

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::sync::{broadcast, watch};
use tracing::Instrument;

use crate::config::ServerConfig;
use crate::http::dispatch::Dispatcher;
use crate::lifecycle::startup::{build_dispatcher, StartupError};
use crate::net::{Connection, Listener, ListenerError};
use crate::observability::LogSink;
use crate::routing::Route;

/// Lifecycle state of an `HttpServer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Listening,
    /// Waiting for a permit or the next connection.
    Accepting,
    /// Processing one accepted connection's request.
    Dispatching,
    Stopped,
}

/// A bound server ready to run.
pub struct HttpServer {
    listener: Listener,
    dispatcher: Arc<Dispatcher>,
    state: watch::Sender<ServerState>,
}

impl HttpServer {
    /// Validate `config`, compile `routes` and bind the listener.
    pub async fn bind(
        config: &ServerConfig,
        routes: impl IntoIterator<Item = Route>,
        log: Option<LogSink>,
    ) -> Result<Self, StartupError> {
        let (state, _) = watch::channel(ServerState::Created);
        let dispatcher = build_dispatcher(config, routes, log)?;

        let addr = config
            .listener
            .socket_addr()
            .expect("bind address checked by validate_config");
        let listener = Listener::bind(addr, config.listener.connection_limit()).await?;

        Ok(Self::from_parts(listener, dispatcher, state))
    }

    /// Assemble a server from an already bound listener.
    pub fn new(listener: Listener, dispatcher: Dispatcher) -> Self {
        let (state, _) = watch::channel(ServerState::Created);
        Self::from_parts(listener, dispatcher, state)
    }

    fn from_parts(listener: Listener, dispatcher: Dispatcher, state: watch::Sender<ServerState>) -> Self {
        state.send_replace(ServerState::Listening);
        Self {
            listener,
            dispatcher: Arc::new(dispatcher),
            state,
        }
    }

    /// Subscribe to lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Run the accept loop until `shutdown` fires (or its sender is dropped).
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ListenerError> {
        let addr = self.listener.local_addr().map_err(ListenerError::Accept)?;
        tracing::info!(
            address = %addr,
            max_connections = ?self.listener.max_connections(),
            "HTTP server starting"
        );

        loop {
            self.state.send_replace(ServerState::Accepting);

            let accepted = tokio::select! {
                _ = shutdown.recv() => break,
                accepted = self.listener.accept() => accepted,
            };

            match accepted {
                Ok(connection) => {
                    self.state.send_replace(ServerState::Dispatching);
                    self.serve(connection).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept connection");
                }
            }
        }

        self.state.send_replace(ServerState::Stopped);
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve the single request carried by `connection` to completion.
    async fn serve(&self, connection: Connection) {
        let Connection { id, peer, stream } = connection;
        let span = tracing::info_span!("connection", connection_id = %id, peer = %peer);

        let dispatcher = Arc::clone(&self.dispatcher);
        let service = service_fn(move |request| {
            let dispatcher = Arc::clone(&dispatcher);
            async move { Ok::<_, Infallible>(dispatcher.handle(peer, request).await) }
        });

        let served = http1::Builder::new()
            .keep_alive(false)
            .serve_connection(TokioIo::new(stream), service)
            .instrument(span.clone())
            .await;

        if let Err(e) = served {
            span.in_scope(|| tracing::debug!(error = %e, "Connection closed with error"));
        }
    }
}
