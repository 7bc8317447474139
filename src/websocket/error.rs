//! Pool Error Types

use thiserror::Error;

use super::client::ClientId;

/// Errors returned to callers of the pool, hub and client APIs
///
/// Transport failures are not represented here: they tear the connection
/// down and are reported through `PoolHandler::on_disconnect`.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The message could not be serialized to JSON
    #[error("Failed to encode message: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The client has been destroyed or closed its outbound queue
    #[error("Client {0} is closed")]
    ClientClosed(ClientId),

    /// The client's outbound queue is full (non-waiting sends only)
    #[error("Send queue for client {0} is full")]
    QueueFull(ClientId),

    /// `start` was called on a client that is already running
    #[error("Client {0} was already started")]
    AlreadyStarted(ClientId),
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
