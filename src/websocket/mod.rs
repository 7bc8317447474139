//! WebSocket Connection Pool
//!
//! Tracks every upgraded connection as an addressable client and lets
//! application code publish to one, some or all of them.
//!
//! ## Architecture
//!
//! - **Pool**: Owns the hub, configuration and hooks; creates clients
//! - **Hub**: Single actor owning the set of connected clients
//! - **Client**: One connection with a read loop, a write loop and a
//!   bounded outbound queue
//! - **Handler**: axum upgrade handler feeding sockets to the pool
//!
//! ## Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use axum::{routing::get, Router};
//! use std::sync::Arc;
//! use wspool::config::PoolConfig;
//! use wspool::websocket::{websocket_handler, Client, Pool, PoolHandler};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl PoolHandler for Echo {
//!     async fn on_message(&self, client: &Arc<Client>, payload: &[u8]) -> bool {
//!         let _ = client.send_raw(payload.to_vec()).await;
//!         false
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = Pool::new(PoolConfig::default(), Arc::new(Echo));
//!     let app = Router::new()
//!         .route("/ws", get(websocket_handler))
//!         .with_state(pool);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8090").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod handler;
mod hub;
mod pool;

pub use client::{Auth, Client, ClientId, CloseReason};
pub use error::{PoolError, PoolResult};
pub use handler::websocket_handler;
pub use hub::Hub;
pub use pool::{DefaultHandler, Pool, PoolHandler};
