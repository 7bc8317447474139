//! Connection Pool
//!
//! Composition root: owns the hub, the configuration and the application's
//! hooks, and builds a [`Client`] for every upgraded socket.

use async_trait::async_trait;
use axum::extract::ws::WebSocket;
use axum::http::HeaderMap;
use futures_util::future::join_all;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::Span;

use super::client::Client;
use super::error::PoolResult;
use super::hub::Hub;
use crate::config::PoolConfig;

/// Application hooks invoked at fixed points of a client's lifecycle
#[async_trait]
pub trait PoolHandler: Send + Sync + 'static {
    /// Called once the client is registered and both loops are running
    async fn on_connect(&self, client: &Arc<Client>) {
        tracing::info!(client_id = %client.id(), remote = ?client.remote_addr(), "Client connected");
    }

    /// Called exactly once, after the client has left the hub
    async fn on_disconnect(&self, _client: &Arc<Client>) {}

    /// Called for every inbound text or binary message
    ///
    /// Returning `true` closes the connection.
    async fn on_message(&self, client: &Arc<Client>, payload: &[u8]) -> bool {
        tracing::debug!(
            client_id = %client.id(),
            message = %String::from_utf8_lossy(payload),
            "Received message"
        );
        false
    }

    /// Decide whether an upgrade request from `origin` is accepted
    fn check_origin(&self, _origin: Option<&str>, _headers: &HeaderMap) -> bool {
        true
    }
}

/// Logs connections and messages, accepts every origin
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHandler;

impl PoolHandler for DefaultHandler {}

/// WebSocket connection pool
pub struct Pool {
    config: PoolConfig,
    handler: Arc<dyn PoolHandler>,
    hub: Hub,
    span: Span,
}

impl Pool {
    /// Create a pool and spawn its hub
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: PoolConfig, handler: Arc<dyn PoolHandler>) -> Arc<Self> {
        let span = tracing::info_span!("pool", name = %config.name);
        if let Err(e) = config.validate() {
            tracing::warn!(parent: &span, error = %e, "Pool config out of range, clamping");
        }
        let hub = Hub::new(span.clone());

        Arc::new(Self {
            config,
            handler,
            hub,
            span,
        })
    }

    /// A pool with default configuration and [`DefaultHandler`]
    pub fn with_defaults() -> Arc<Self> {
        Self::new(PoolConfig::default(), Arc::new(DefaultHandler))
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn handler(&self) -> &Arc<dyn PoolHandler> {
        &self.handler
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Span every client task of this pool runs in
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Wrap an upgraded socket in a client, starting it unless autostart is disabled
    pub async fn new_client(
        self: &Arc<Self>,
        socket: WebSocket,
        remote_addr: Option<SocketAddr>,
    ) -> Arc<Client> {
        tracing::debug!(parent: &self.span, remote = ?remote_addr, "New client is being created");
        let client = Client::new(Arc::clone(self), socket, remote_addr);

        if !self.config.disable_client_autostart {
            if let Err(e) = client.start().await {
                tracing::error!(parent: &self.span, client_id = %client.id(), error = %e, "Failed to start client");
            }
        }
        client
    }

    /// Queue `message` on every connected client
    pub async fn broadcast<T: Serialize + ?Sized>(&self, message: &T) -> PoolResult<usize> {
        self.hub.broadcast(message).await
    }

    /// Destroy every registered client
    pub async fn shutdown(&self) {
        let members = self.hub.members().await;
        let count = members.len();
        join_all(members.iter().map(|client| client.destroy())).await;
        tracing::info!(parent: &self.span, clients = count, "Pool shut down");
    }
}
