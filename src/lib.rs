//! # wspool
//!
//! WebSocket connection pool: every upgraded connection becomes an
//! addressable [`Client`], registered with a central [`Hub`] so application
//! code can publish to one, many or all clients without touching sockets.
//!
//! ## Features
//!
//! - **Two tasks per connection**: read loop and write loop, torn down together
//! - **Backpressure**: bounded per-client queues, senders wait when full
//! - **Liveness**: periodic pings, connections without pongs are dropped
//! - **Single-writer hub**: membership changes go through one actor task
//! - **Per-client state**: concurrent metadata store and an auth slot
//!
//! ## Modules
//!
//! - [`websocket`]: Pool, hub, clients and the axum upgrade handler
//! - [`config`]: TOML and environment configuration
//! - [`api`]: Router with the `/ws` and health endpoints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wspool::{AppState, Pool, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = Pool::with_defaults();
//!     wspool::serve(AppState::new(pool), &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod websocket;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig, PoolConfig, ServerConfig};

pub use websocket::{
    websocket_handler, Auth, Client, ClientId, CloseReason, DefaultHandler, Hub, Pool,
    PoolError, PoolHandler, PoolResult,
};
