//! WebSocket Client
//!
//! One `Client` per upgraded connection. A started client runs two tasks:
//! the read loop feeds inbound messages to the pool's handler and enforces
//! the pong deadline, the write loop drains the bounded outbound queue and
//! pings the peer. Either loop ending tears the client down through
//! [`Client::destroy`], which runs exactly once.

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use dashmap::DashMap;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex as StdMutex, PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{watch, Mutex};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::Instrument;
use uuid::Uuid;

use super::error::{PoolError, PoolResult};
use super::pool::Pool;

/// Unique identifier for a connected client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Authentication slot attached to every client
///
/// The pool never interprets it; application code fills it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auth {
    pub token: String,
    pub authenticated: bool,
}

/// Why a client's connection ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// Peer closed with a normal or going-away code (or no code at all)
    Normal(u16),
    /// Peer vanished without a closing handshake
    Abnormal,
    /// Peer closed with a code we did not expect
    Unexpected(u16),
    /// No pong arrived within the read deadline
    ReadDeadline,
    /// The inbound stream ended
    StreamEnded,
    /// Read failed for any other reason
    Transport(String),
    /// Inbound message exceeded `max_message_size` (bytes received)
    TooLarge(usize),
    /// `on_message` asked for the connection to be closed
    Handler,
    /// Torn down from our side
    Local,
}

impl CloseReason {
    pub fn from_close_frame(frame: Option<&CloseFrame<'_>>) -> Self {
        match frame.map(|f| f.code) {
            None => CloseReason::Normal(close_code::STATUS),
            Some(code @ (close_code::NORMAL | close_code::AWAY)) => CloseReason::Normal(code),
            Some(close_code::ABNORMAL) => CloseReason::Abnormal,
            Some(code) => CloseReason::Unexpected(code),
        }
    }

    pub fn from_transport_error(error: &axum::Error) -> Self {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
        while let Some(err) = source {
            if let Some(io) = err.downcast_ref::<std::io::Error>() {
                use std::io::ErrorKind::*;
                if matches!(
                    io.kind(),
                    ConnectionReset | ConnectionAborted | BrokenPipe | UnexpectedEof
                ) {
                    return CloseReason::Abnormal;
                }
            }
            source = err.source();
        }

        let message = error.to_string();
        // tungstenite reports a dropped TCP stream as a protocol error
        if message.contains("without closing handshake") {
            return CloseReason::Abnormal;
        }
        CloseReason::Transport(message)
    }

    /// Whether this is routine peer behaviour rather than a fault
    pub fn is_expected(&self) -> bool {
        !matches!(
            self,
            CloseReason::Unexpected(_)
                | CloseReason::ReadDeadline
                | CloseReason::Transport(_)
                | CloseReason::TooLarge(_)
        )
    }

    fn log(&self, client_id: ClientId, remote: Option<SocketAddr>) {
        if self.is_expected() {
            tracing::info!(client_id = %client_id, remote = ?remote, reason = %self, "Client disconnected");
        } else {
            tracing::warn!(client_id = %client_id, remote = ?remote, reason = %self, "Closing connection");
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::Normal(code) => write!(f, "closed by peer ({})", code),
            CloseReason::Abnormal => write!(f, "abnormal closure (1006)"),
            CloseReason::Unexpected(code) => write!(f, "unexpected close code {}", code),
            CloseReason::ReadDeadline => write!(f, "pong deadline expired"),
            CloseReason::StreamEnded => write!(f, "stream ended"),
            CloseReason::Transport(e) => write!(f, "transport error: {}", e),
            CloseReason::TooLarge(len) => write!(f, "message of {} bytes exceeds limit", len),
            CloseReason::Handler => write!(f, "closed by message handler"),
            CloseReason::Local => write!(f, "closed locally"),
        }
    }
}

/// Socket and queue receiver waiting for `start`
struct Transport {
    socket: WebSocket,
    queue: mpsc::Receiver<Vec<u8>>,
}

struct Lifecycle {
    active: bool,
    destroyed: bool,
    transport: Option<Transport>,
}

/// A connected peer
pub struct Client {
    id: ClientId,
    remote_addr: Option<SocketAddr>,
    pool: Arc<Pool>,
    /// Producer side of the outbound queue; `None` once closed
    queue: StdMutex<Option<mpsc::Sender<Vec<u8>>>>,
    metadata: DashMap<String, Value>,
    auth: RwLock<Auth>,
    /// Guards every start/teardown transition
    lifecycle: Mutex<Lifecycle>,
    shutdown: watch::Sender<bool>,
}

impl Client {
    pub(crate) fn new(
        pool: Arc<Pool>,
        socket: WebSocket,
        remote_addr: Option<SocketAddr>,
    ) -> Arc<Self> {
        let (sender, queue) = mpsc::channel(pool.config().send_queue_size.max(1));
        Self::assemble(pool, remote_addr, sender, Some(Transport { socket, queue }), false)
    }

    /// A client with no socket, its queue receiver handed to the caller
    #[cfg(test)]
    pub(crate) fn detached(pool: &Arc<Pool>) -> (Arc<Self>, mpsc::Receiver<Vec<u8>>) {
        let (sender, queue) = mpsc::channel(pool.config().send_queue_size.max(1));
        (Self::assemble(Arc::clone(pool), None, sender, None, true), queue)
    }

    fn assemble(
        pool: Arc<Pool>,
        remote_addr: Option<SocketAddr>,
        sender: mpsc::Sender<Vec<u8>>,
        transport: Option<Transport>,
        active: bool,
    ) -> Arc<Self> {
        let (shutdown, _) = watch::channel(false);
        Arc::new(Self {
            id: ClientId::new(),
            remote_addr,
            pool,
            queue: StdMutex::new(Some(sender)),
            metadata: DashMap::new(),
            auth: RwLock::new(Auth::default()),
            lifecycle: Mutex::new(Lifecycle {
                active,
                destroyed: false,
                transport,
            }),
            shutdown,
        })
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// The pool this client belongs to
    pub fn pool(&self) -> &Arc<Pool> {
        &self.pool
    }

    pub async fn is_active(&self) -> bool {
        self.lifecycle.lock().await.active
    }

    /// Register with the hub, spawn both loops and fire `on_connect`
    ///
    /// The pool calls this on construction unless autostart is disabled.
    pub async fn start(self: &Arc<Self>) -> PoolResult<()> {
        let transport = {
            let mut lifecycle = self.lifecycle.lock().await;
            if lifecycle.destroyed {
                return Err(PoolError::ClientClosed(self.id));
            }
            let transport = lifecycle
                .transport
                .take()
                .ok_or(PoolError::AlreadyStarted(self.id))?;
            lifecycle.active = true;
            self.pool.hub().register(Arc::clone(self));
            transport
        };

        let (sink, stream) = transport.socket.split();
        let span = self.pool.span().clone();
        tokio::spawn(Arc::clone(self).read_loop(stream).instrument(span.clone()));
        tokio::spawn(
            Arc::clone(self)
                .write_loop(sink, transport.queue)
                .instrument(span),
        );

        self.pool.handler().on_connect(self).await;
        Ok(())
    }

    /// Encode `message` as JSON and queue it as one text frame
    ///
    /// Waits while this client's queue is full.
    pub async fn send<T: Serialize + ?Sized>(&self, message: &T) -> PoolResult<()> {
        let payload = serde_json::to_vec(message).map_err(|e| {
            tracing::error!(client_id = %self.id, error = %e, "Failed to encode message");
            PoolError::Encoding(e)
        })?;
        self.send_raw(payload).await
    }

    /// Queue an already encoded payload
    pub async fn send_raw(&self, payload: impl Into<Vec<u8>>) -> PoolResult<()> {
        let sender = self.sender()?;
        sender
            .send(payload.into())
            .await
            .map_err(|_| PoolError::ClientClosed(self.id))
    }

    /// Queue a payload without waiting for space
    pub fn try_send_raw(&self, payload: impl Into<Vec<u8>>) -> PoolResult<()> {
        let sender = self.sender()?;
        sender.try_send(payload.into()).map_err(|e| match e {
            TrySendError::Full(_) => PoolError::QueueFull(self.id),
            TrySendError::Closed(_) => PoolError::ClientClosed(self.id),
        })
    }

    fn sender(&self) -> PoolResult<mpsc::Sender<Vec<u8>>> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(PoolError::ClientClosed(self.id))
    }

    /// Close the outbound queue
    ///
    /// Messages already queued are still written; the write loop then sends
    /// a close frame and the client is destroyed.
    pub fn close(&self) {
        let sender = self.queue.lock().unwrap_or_else(PoisonError::into_inner).take();
        if sender.is_some() {
            tracing::debug!(client_id = %self.id, "Outbound queue closed");
        }
    }

    /// Tear the client down
    ///
    /// Unregisters from the hub, clears the active flag, closes the
    /// connection and fires `on_disconnect`. Later calls return immediately.
    pub async fn destroy(self: &Arc<Self>) {
        {
            let mut lifecycle = self.lifecycle.lock().await;
            if lifecycle.destroyed {
                return;
            }
            tracing::debug!(client_id = %self.id, remote = ?self.remote_addr, "About to destroy client");
            lifecycle.destroyed = true;
            self.pool.hub().unregister(self.id);
            lifecycle.active = false;
            // Never started: dropping the socket closes it
            lifecycle.transport = None;
            self.shutdown.send_replace(true);
            self.queue.lock().unwrap_or_else(PoisonError::into_inner).take();
        }

        tracing::info!(client_id = %self.id, remote = ?self.remote_addr, "Destroyed client");
        self.pool.handler().on_disconnect(self).await;
    }

    async fn read_loop(self: Arc<Self>, mut stream: SplitStream<WebSocket>) {
        let pong_wait = self.pool.config().pong_wait();
        let max_message_size = self.pool.config().max_message_size;
        let mut shutdown = self.shutdown.subscribe();
        let mut deadline = Instant::now() + pong_wait;

        let reason = loop {
            let next = tokio::select! {
                _ = wait_for_shutdown(&mut shutdown) => break CloseReason::Local,
                next = time::timeout_at(deadline, stream.next()) => next,
            };

            let message = match next {
                Err(_) => break CloseReason::ReadDeadline,
                Ok(None) => break CloseReason::StreamEnded,
                Ok(Some(Err(e))) => break CloseReason::from_transport_error(&e),
                Ok(Some(Ok(message))) => message,
            };

            let payload = match message {
                Message::Text(text) => text.into_bytes(),
                Message::Binary(bytes) => bytes,
                Message::Pong(_) => {
                    deadline = Instant::now() + pong_wait;
                    continue;
                }
                // Answered by the transport
                Message::Ping(_) => continue,
                Message::Close(frame) => break CloseReason::from_close_frame(frame.as_ref()),
            };

            // The upgrade layer may not have applied the limit
            if payload.len() > max_message_size {
                break CloseReason::TooLarge(payload.len());
            }

            if self.pool.handler().on_message(&self, &payload).await {
                break CloseReason::Handler;
            }
        };

        reason.log(self.id, self.remote_addr);
        self.destroy().await;
    }

    async fn write_loop(
        self: Arc<Self>,
        mut sink: SplitSink<WebSocket, Message>,
        mut queue: mpsc::Receiver<Vec<u8>>,
    ) {
        let write_wait = self.pool.config().write_wait();
        let ping_period = self.pool.config().ping_period();
        let mut shutdown = self.shutdown.subscribe();
        let mut ticker = time::interval_at(Instant::now() + ping_period, ping_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = wait_for_shutdown(&mut shutdown) => break,
                queued = queue.recv() => {
                    let Some(payload) = queued else {
                        let frame = CloseFrame {
                            code: close_code::NORMAL,
                            reason: "".into(),
                        };
                        let _ = write_with_deadline(&mut sink, Message::Close(Some(frame)), write_wait).await;
                        break;
                    };
                    if let Err(e) = write_with_deadline(&mut sink, into_message(payload), write_wait).await {
                        tracing::debug!(client_id = %self.id, error = %e, "Write failed, closing connection");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = write_with_deadline(&mut sink, Message::Ping(Vec::new()), write_wait).await {
                        tracing::debug!(client_id = %self.id, error = %e, "Ping failed, closing connection");
                        break;
                    }
                }
            }
        }

        {
            let mut lifecycle = self.lifecycle.lock().await;
            drop(ticker);
            let _ = time::timeout(write_wait, sink.close()).await;
            lifecycle.active = false;
        }
        self.destroy().await;
    }

    /// Set a metadata value, returning the previous one
    pub fn set_meta(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.metadata.insert(key.into(), value.into())
    }

    pub fn meta(&self, key: &str) -> Option<Value> {
        self.metadata.get(key).map(|entry| entry.value().clone())
    }

    pub fn remove_meta(&self, key: &str) -> Option<Value> {
        self.metadata.remove(key).map(|(_, value)| value)
    }

    pub fn has_meta(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    pub fn meta_len(&self) -> usize {
        self.metadata.len()
    }

    pub fn auth(&self) -> Auth {
        self.auth.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_auth(&self, auth: Auth) {
        *self.auth.write().unwrap_or_else(PoisonError::into_inner) = auth;
    }

    /// Mark the client authenticated with `token`
    pub fn authenticate(&self, token: impl Into<String>) {
        self.set_auth(Auth {
            token: token.into(),
            authenticated: true,
        });
    }

    pub fn clear_auth(&self) {
        self.set_auth(Auth::default());
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.read().unwrap_or_else(PoisonError::into_inner).authenticated
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id)
            .field("remote_addr", &self.remote_addr)
            .finish_non_exhaustive()
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        // A dropped sender means the client is gone as well
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Failure of a single frame write
#[derive(Debug, Error)]
enum WriteError {
    #[error("write deadline of {0:?} exceeded")]
    Deadline(Duration),

    #[error(transparent)]
    Transport(#[from] axum::Error),
}

async fn write_with_deadline(
    sink: &mut SplitSink<WebSocket, Message>,
    message: Message,
    wait: Duration,
) -> Result<(), WriteError> {
    time::timeout(wait, sink.send(message))
        .await
        .map_err(|_| WriteError::Deadline(wait))??;
    Ok(())
}

fn into_message(payload: Vec<u8>) -> Message {
    match String::from_utf8(payload) {
        Ok(text) => Message::Text(text),
        Err(e) => Message::Binary(e.into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::websocket::pool::{DefaultHandler, PoolHandler};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHandler {
        disconnects: AtomicUsize,
    }

    #[async_trait]
    impl PoolHandler for CountingHandler {
        async fn on_disconnect(&self, _client: &Arc<Client>) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pool_with_queue(send_queue_size: usize) -> Arc<Pool> {
        let config = PoolConfig {
            send_queue_size,
            ..Default::default()
        };
        Pool::new(config, Arc::new(DefaultHandler))
    }

    #[tokio::test]
    async fn test_metadata_store() {
        let pool = pool_with_queue(4);
        let (client, _rx) = Client::detached(&pool);

        assert!(client.set_meta("user", "alice").is_none());
        assert_eq!(client.set_meta("user", "bob"), Some(Value::from("alice")));
        client.set_meta("room", 7);

        assert_eq!(client.meta("user"), Some(Value::from("bob")));
        assert!(client.has_meta("room"));
        assert_eq!(client.meta_len(), 2);

        assert_eq!(client.remove_meta("room"), Some(Value::from(7)));
        assert!(client.meta("room").is_none());
        assert!(client.remove_meta("room").is_none());
    }

    #[tokio::test]
    async fn test_metadata_concurrent_writers() {
        let pool = pool_with_queue(4);
        let (client, _rx) = Client::detached(&pool);

        let mut tasks = Vec::new();
        for i in 0..16 {
            let client = Arc::clone(&client);
            tasks.push(tokio::spawn(async move {
                client.set_meta(format!("key-{}", i), i);
                client.set_meta("shared", i);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(client.meta_len(), 17);
        assert!(client.meta("shared").is_some());
    }

    #[tokio::test]
    async fn test_auth_slot() {
        let pool = pool_with_queue(4);
        let (client, _rx) = Client::detached(&pool);

        assert_eq!(client.auth(), Auth::default());
        assert!(!client.is_authenticated());

        client.authenticate("secret");
        assert!(client.is_authenticated());
        assert_eq!(client.auth().token, "secret");

        client.clear_auth();
        assert!(!client.is_authenticated());
        assert!(client.auth().token.is_empty());
    }

    #[tokio::test]
    async fn test_send_blocks_when_queue_full() {
        let pool = pool_with_queue(2);
        let (client, mut rx) = Client::detached(&pool);

        for i in 0..2 {
            time::timeout(Duration::from_millis(100), client.send(&i))
                .await
                .expect("send within capacity should not wait")
                .unwrap();
        }

        let blocked = time::timeout(Duration::from_millis(100), client.send(&2)).await;
        assert!(blocked.is_err(), "third send should wait for space");

        let pending = {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.send(&3).await })
        };
        assert_eq!(rx.recv().await.unwrap(), b"0".to_vec());

        time::timeout(Duration::from_secs(1), pending)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(rx.recv().await.unwrap(), b"1".to_vec());
        assert_eq!(rx.recv().await.unwrap(), b"3".to_vec());
    }

    #[tokio::test]
    async fn test_try_send_reports_full_queue() {
        let pool = pool_with_queue(1);
        let (client, _rx) = Client::detached(&pool);

        client.try_send_raw("first").unwrap();
        assert!(matches!(
            client.try_send_raw("second"),
            Err(PoolError::QueueFull(id)) if id == client.id()
        ));
    }

    #[tokio::test]
    async fn test_send_encoding_error_keeps_client_usable() {
        let pool = pool_with_queue(4);
        let (client, mut rx) = Client::detached(&pool);

        let mut bad = HashMap::new();
        bad.insert(vec![1u8, 2], "value");
        assert!(matches!(client.send(&bad).await, Err(PoolError::Encoding(_))));

        client.send(&serde_json::json!({"type": "hello"})).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), br#"{"type":"hello"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_concurrent_destroy_runs_once() {
        let handler = Arc::new(CountingHandler::default());
        let pool = Pool::new(PoolConfig::default(), handler.clone());
        let (client, _rx) = Client::detached(&pool);
        pool.hub().register(Arc::clone(&client));
        assert_eq!(pool.hub().len().await, 1);

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let client = Arc::clone(&client);
            tasks.push(tokio::spawn(async move { client.destroy().await }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(handler.disconnects.load(Ordering::SeqCst), 1);
        assert!(!client.is_active().await);
        assert!(pool.hub().get(client.id()).await.is_none());
        assert!(matches!(
            client.send(&"late").await,
            Err(PoolError::ClientClosed(_))
        ));
    }

    #[tokio::test]
    async fn test_start_rules() {
        let pool = pool_with_queue(4);
        let (client, _rx) = Client::detached(&pool);

        assert!(matches!(
            client.start().await,
            Err(PoolError::AlreadyStarted(_))
        ));

        client.destroy().await;
        assert!(matches!(client.start().await, Err(PoolError::ClientClosed(_))));
    }

    #[tokio::test]
    async fn test_close_drains_then_closes_queue() {
        let pool = pool_with_queue(4);
        let (client, mut rx) = Client::detached(&pool);

        client.send(&"queued").await.unwrap();
        client.close();

        assert!(matches!(
            client.send(&"after").await,
            Err(PoolError::ClientClosed(_))
        ));
        assert_eq!(rx.recv().await.unwrap(), br#""queued""#.to_vec());
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_close_reason_from_frame() {
        let frame = |code| CloseFrame {
            code,
            reason: "".into(),
        };

        assert_eq!(
            CloseReason::from_close_frame(Some(&frame(close_code::AWAY))),
            CloseReason::Normal(close_code::AWAY)
        );
        assert_eq!(
            CloseReason::from_close_frame(Some(&frame(close_code::ABNORMAL))),
            CloseReason::Abnormal
        );
        assert_eq!(
            CloseReason::from_close_frame(None),
            CloseReason::Normal(close_code::STATUS)
        );

        let policy = CloseReason::from_close_frame(Some(&frame(close_code::POLICY)));
        assert_eq!(policy, CloseReason::Unexpected(close_code::POLICY));
        assert!(!policy.is_expected());
        assert!(CloseReason::Abnormal.is_expected());
        assert!(!CloseReason::ReadDeadline.is_expected());
    }

    #[test]
    fn test_close_reason_from_io_error() {
        let reset = axum::Error::new(std::io::Error::from(std::io::ErrorKind::ConnectionReset));
        assert_eq!(CloseReason::from_transport_error(&reset), CloseReason::Abnormal);

        let other = axum::Error::new(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(matches!(
            CloseReason::from_transport_error(&other),
            CloseReason::Transport(_)
        ));
    }

    #[test]
    fn test_close_reason_from_reset_without_handshake() {
        use tokio_tungstenite::tungstenite::{error::ProtocolError, Error as WsError};

        let reset = axum::Error::new(WsError::Protocol(
            ProtocolError::ResetWithoutClosingHandshake,
        ));
        assert_eq!(CloseReason::from_transport_error(&reset), CloseReason::Abnormal);

        let bad_frame = axum::Error::new(WsError::Protocol(ProtocolError::NonZeroReservedBits));
        assert!(matches!(
            CloseReason::from_transport_error(&bad_frame),
            CloseReason::Transport(_)
        ));
    }

    #[test]
    fn test_too_large_is_unexpected() {
        let reason = CloseReason::TooLarge(1024);
        assert!(!reason.is_expected());
        assert_eq!(reason.to_string(), "message of 1024 bytes exceeds limit");
    }

    #[test]
    fn test_write_error_messages() {
        let deadline = WriteError::Deadline(Duration::from_millis(5));
        assert_eq!(deadline.to_string(), "write deadline of 5ms exceeded");

        let transport = WriteError::from(axum::Error::new(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        )));
        assert_eq!(transport.to_string(), "pipe closed");
    }
}
