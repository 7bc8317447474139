//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and hands accepted sockets to the pool.

use axum::{
    extract::{ws::WebSocketUpgrade, ConnectInfo, State},
    http::{header::ORIGIN, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use super::pool::Pool;

/// WebSocket upgrade handler
///
/// Rejects the request with 403 when the pool's handler refuses the origin,
/// otherwise upgrades with the pool's message size limit and creates a
/// client for the socket. The remote address is only known when the server
/// runs with `into_make_service_with_connect_info`.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    State(pool): State<Arc<Pool>>,
) -> Response {
    let origin = headers.get(ORIGIN).and_then(|value| value.to_str().ok());
    let remote_addr = connect_info.map(|ConnectInfo(addr)| addr);

    if !pool.handler().check_origin(origin, &headers) {
        tracing::warn!(origin = ?origin, remote = ?remote_addr, "Rejected WebSocket upgrade");
        return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
    }

    ws.max_message_size(pool.config().max_message_size)
        .on_upgrade(move |socket| async move {
            pool.new_client(socket, remote_addr).await;
        })
}
