//! Application State
//!
//! Shared state accessible by all HTTP handlers.

use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::websocket::Pool;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Connection pool behind the `/ws` route
    pub pool: Arc<Pool>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self {
            pool,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get the number of connected clients
    pub async fn connection_count(&self) -> usize {
        self.pool.hub().len().await
    }
}

impl FromRef<AppState> for Arc<Pool> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.pool)
    }
}
