//! Client Hub
//!
//! Authoritative set of connected clients. The membership map is owned by a
//! single actor task; every other context talks to it through an unbounded
//! command channel, so registrations, removals and broadcast snapshots are
//! applied in one order and a broadcast never sees a half-updated map.

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{Instrument, Span};

use super::client::{Client, ClientId};
use super::error::PoolResult;

/// Commands processed by the hub actor
enum HubCommand {
    Register(Arc<Client>),
    Unregister(ClientId),
    Members(oneshot::Sender<Vec<Arc<Client>>>),
    Lookup(ClientId, oneshot::Sender<Option<Arc<Client>>>),
    Count(oneshot::Sender<usize>),
}

/// Handle to the hub actor
pub struct Hub {
    commands: mpsc::UnboundedSender<HubCommand>,
}

/// State owned by the actor task
#[derive(Default)]
struct Registry {
    clients: HashMap<ClientId, Arc<Client>>,
}

impl Registry {
    fn apply(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(client) => {
                let id = client.id();
                if self.clients.insert(id, client).is_none() {
                    tracing::debug!(client_id = %id, connections = self.clients.len(), "Client registered");
                }
            }
            HubCommand::Unregister(id) => {
                if self.clients.remove(&id).is_some() {
                    tracing::debug!(client_id = %id, connections = self.clients.len(), "Client unregistered");
                }
            }
            HubCommand::Members(reply) => {
                let _ = reply.send(self.clients.values().cloned().collect());
            }
            HubCommand::Lookup(id, reply) => {
                let _ = reply.send(self.clients.get(&id).cloned());
            }
            HubCommand::Count(reply) => {
                let _ = reply.send(self.clients.len());
            }
        }
    }
}

impl Hub {
    /// Spawn the hub actor
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(span: Span) -> Self {
        let (commands, mut receiver) = mpsc::unbounded_channel();

        tokio::spawn(
            async move {
                let mut registry = Registry::default();
                while let Some(command) = receiver.recv().await {
                    registry.apply(command);
                }
                tracing::debug!("Hub stopped");
            }
            .instrument(span),
        );

        Self { commands }
    }

    /// Add a client; registering a present client replaces it in place
    pub fn register(&self, client: Arc<Client>) {
        self.submit(HubCommand::Register(client));
    }

    /// Remove a client; no-op when it is not registered
    pub fn unregister(&self, id: ClientId) {
        self.submit(HubCommand::Unregister(id));
    }

    fn submit(&self, command: HubCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Hub actor is gone, command dropped");
        }
    }

    async fn query<T: Default>(&self, command: impl FnOnce(oneshot::Sender<T>) -> HubCommand) -> T {
        let (reply, response) = oneshot::channel();
        self.submit(command(reply));
        response.await.unwrap_or_default()
    }

    /// Snapshot of every registered client
    pub async fn members(&self) -> Vec<Arc<Client>> {
        self.query(HubCommand::Members).await
    }

    pub async fn get(&self, id: ClientId) -> Option<Arc<Client>> {
        self.query(|reply| HubCommand::Lookup(id, reply)).await
    }

    /// Get the current connection count
    pub async fn len(&self) -> usize {
        self.query(HubCommand::Count).await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Registered clients whose metadata `key` equals `value`
    pub async fn find_by_meta(&self, key: &str, value: &Value) -> Vec<Arc<Client>> {
        self.members()
            .await
            .into_iter()
            .filter(|client| client.meta(key).as_ref() == Some(value))
            .collect()
    }

    /// Encode `message` once and queue it on every registered client
    ///
    /// Returns how many clients accepted it.
    pub async fn broadcast<T: Serialize + ?Sized>(&self, message: &T) -> PoolResult<usize> {
        let payload = serde_json::to_vec(message)?;
        Ok(self.broadcast_raw(payload).await)
    }

    /// Queue a payload on every registered client
    ///
    /// Each client's queue is filled concurrently: a full queue holds up
    /// this call but not delivery to the other clients.
    pub async fn broadcast_raw(&self, payload: impl Into<Vec<u8>>) -> usize {
        let payload = payload.into();
        let members = self.members().await;

        let results = join_all(
            members
                .iter()
                .map(|client| client.send_raw(payload.clone())),
        )
        .await;
        let delivered = results.iter().filter(|result| result.is_ok()).count();

        tracing::trace!(members = members.len(), delivered, "Broadcast payload");
        delivered
    }
}
