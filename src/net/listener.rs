//! TCP listener with an optional accept gate.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming TCP connections
//! - Gate each accept on a permit when a connection limit is configured
//!
//! # Design Decisions
//! - The permit is acquired before `accept` and released as soon as the
//!   connection is accepted, before any request processing; the limit bounds
//!   how far accepting may run ahead, not handler concurrency
//! - No limit configured means accepting is unbounded
//! - A limit of zero means no permit is ever available

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;

use crate::net::connection::{Connection, ConnectionId};

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to address.
    Bind(std::io::Error),
    /// Failed to accept connection.
    Accept(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
            ListenerError::Accept(e) => write!(f, "Failed to accept: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::Bind(e) | ListenerError::Accept(e) => Some(e),
        }
    }
}

/// A TCP listener whose accepts may be gated by a counting semaphore.
#[derive(Debug)]
pub struct Listener {
    /// The underlying TCP listener.
    inner: TcpListener,
    /// Permits gating accepts, if limiting is configured.
    gate: Option<Semaphore>,
    /// Configured permit count.
    max_connections: Option<usize>,
}

impl Listener {
    /// Bind to `addr`, gating accepts with `max_connections` permits if given.
    pub async fn bind(addr: SocketAddr, max_connections: Option<usize>) -> Result<Self, ListenerError> {
        let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;

        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %local_addr,
            max_connections = ?max_connections,
            "Listener bound"
        );

        if max_connections == Some(0) {
            tracing::warn!("Connection limit is zero; no connection will ever be accepted");
        }

        Ok(Self {
            inner: listener,
            gate: max_connections.map(Semaphore::new),
            max_connections,
        })
    }

    /// Accept the next connection.
    ///
    /// Waits for a permit first when gated; the permit is returned before
    /// this method does.
    pub async fn accept(&self) -> Result<Connection, ListenerError> {
        let permit = match &self.gate {
            Some(gate) => Some(gate.acquire().await.expect("accept gate is never closed")),
            None => None,
        };

        let (stream, peer) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        // Released before the request is processed
        drop(permit);

        let id = ConnectionId::new();
        tracing::debug!(
            connection_id = %id,
            peer_addr = %peer,
            available_permits = ?self.available_permits(),
            "Connection accepted"
        );

        Ok(Connection { id, peer, stream })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// Currently available permits, if gated.
    pub fn available_permits(&self) -> Option<usize> {
        self.gate.as_ref().map(Semaphore::available_permits)
    }

    /// Get configured maximum connections.
    pub fn max_connections(&self) -> Option<usize> {
        self.max_connections
    }
}
