use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;
use tokio::sync::{mpsc, watch, RwLock};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, error, info, warn};
use url::Url;

use td_types::{AccountDetails, AccountSummary, Event, Grouping, Tick, TradeEstablished};

use crate::error::{Result, TdError};
use crate::websocket::base_client::{self, WsConnection, WsReader};
use crate::websocket::models::{self, ServerMessage};

const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Pending,
    Ready,
    Closed,
}

/// The streaming session: connect, authenticate, answer heartbeats,
/// multiplex subscriptions and hand decoded events to the consumer in
/// socket order.
///
/// On a recoverable disconnect the session reconnects by itself, forwards
/// the prior connection id so the venue can stitch the session, and replays
/// every tracked subscription.
#[derive(Clone)]
pub struct TdWebSocketClient {
    inner: Arc<Inner>,
}

struct Inner {
    events: mpsc::Sender<Event>,
    shutdown: Arc<AtomicBool>,
    phase_tx: watch::Sender<SessionPhase>,
    phase_rx: watch::Receiver<SessionPhase>,
    subscribed: RwLock<Vec<i32>>,
    conn: RwLock<Option<WsConnection>>,
    connection_id: Mutex<Option<String>>,
    reconnect_delay: Duration,
}

impl TdWebSocketClient {
    pub fn new(events: mpsc::Sender<Event>, shutdown: Arc<AtomicBool>) -> Self {
        Self::with_reconnect_delay(events, shutdown, DEFAULT_RECONNECT_DELAY)
    }

    pub fn with_reconnect_delay(
        events: mpsc::Sender<Event>,
        shutdown: Arc<AtomicBool>,
        reconnect_delay: Duration,
    ) -> Self {
        let (phase_tx, phase_rx) = watch::channel(SessionPhase::Pending);
        TdWebSocketClient {
            inner: Arc::new(Inner {
                events,
                shutdown,
                phase_tx,
                phase_rx,
                subscribed: RwLock::new(Vec::new()),
                conn: RwLock::new(None),
                connection_id: Mutex::new(None),
                reconnect_delay,
            }),
        }
    }

    /// Drive the session until shutdown or a fatal error.
    ///
    /// Recoverable read failures (server close, truncated stream, aborted
    /// I/O) re-enter the connect loop after a short delay; anything else is
    /// surfaced as an error event and ends the session.
    pub async fn run(&self, url: Url, login_id: String, token: String) {
        while !self.inner.shutdown.load(Ordering::SeqCst) {
            info!("connecting to {url}");
            let (mut reader, conn) = match base_client::connect(&url).await {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("websocket connect failed: {e}");
                    if self.inner.shutdown.load(Ordering::SeqCst) {
                        break;
                    }
                    tokio::time::sleep(self.inner.reconnect_delay).await;
                    continue;
                }
            };
            *self.inner.conn.write().await = Some(conn);

            match self.message_loop(&mut reader, &login_id, &token).await {
                Ok(()) => break,
                Err(TdError::Ws(e)) if is_continuable(&e) => {
                    warn!("websocket closed ({e}), reconnecting");
                    let _ = self.inner.phase_tx.send(SessionPhase::Pending);
                    tokio::time::sleep(self.inner.reconnect_delay).await;
                }
                Err(e) => {
                    error!("websocket session failed: {e}");
                    self.emit(Event::Error(e.to_string())).await;
                    break;
                }
            }
        }

        *self.inner.conn.write().await = None;
        let _ = self.inner.phase_tx.send(SessionPhase::Closed);
        self.emit(Event::ConnectionClosed).await;
    }

    /// Track and request a quote stream. Subscribing to an id that is
    /// already tracked is a no-op; until the session has authenticated the
    /// id is only recorded and the post-auth replay picks it up.
    pub async fn subscribe(&self, quote_id: i32) -> Result<()> {
        {
            let mut subscribed = self.inner.subscribed.write().await;
            if subscribed.contains(&quote_id) {
                return Ok(());
            }
            subscribed.push(quote_id);
        }
        if self.phase() != SessionPhase::Ready {
            debug!("subscribe {quote_id} recorded, replayed once the session is ready");
            return Ok(());
        }
        if let Err(e) = self.send(models::subscription("subscribe", quote_id)).await {
            debug!("subscribe {quote_id} deferred to the post-auth replay: {e}");
        }
        Ok(())
    }

    pub async fn unsubscribe(&self, quote_id: i32) -> Result<()> {
        {
            let mut subscribed = self.inner.subscribed.write().await;
            let Some(position) = subscribed.iter().position(|id| *id == quote_id) else {
                return Ok(());
            };
            subscribed.remove(position);
        }
        if self.phase() != SessionPhase::Ready {
            return Ok(());
        }
        if let Err(e) = self.send(models::subscription("unsubscribe", quote_id)).await {
            debug!("unsubscribe {quote_id} dropped with the dead connection: {e}");
        }
        Ok(())
    }

    fn phase(&self) -> SessionPhase {
        *self.inner.phase_rx.borrow()
    }

    /// Block until the session has authenticated, or fail if it closed
    /// first.
    pub async fn wait_ready(&self) -> Result<()> {
        let mut rx = self.inner.phase_rx.clone();
        loop {
            match *rx.borrow_and_update() {
                SessionPhase::Ready => return Ok(()),
                SessionPhase::Closed => {
                    return Err(TdError::WsProtocol("session closed before ready".into()))
                }
                SessionPhase::Pending => {}
            }
            if rx.changed().await.is_err() {
                return Err(TdError::Cancelled);
            }
        }
    }

    pub fn connection_id(&self) -> Option<String> {
        self.inner.connection_id.lock().unwrap().clone()
    }

    /// Flag shutdown and send a normal close; the loop exits on the next
    /// turn.
    pub async fn close(&self) {
        self.inner.shutdown.store(true, Ordering::SeqCst);
        if let Some(conn) = self.inner.conn.read().await.as_ref() {
            conn.close().await;
        }
    }

    async fn message_loop(
        &self,
        reader: &mut WsReader,
        login_id: &str,
        token: &str,
    ) -> Result<()> {
        while !self.inner.shutdown.load(Ordering::SeqCst) {
            let frame = match reader.next().await {
                None => return Err(tungstenite::Error::ConnectionClosed.into()),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(frame)) => frame,
            };
            let text = match frame {
                Message::Text(text) => text.to_string(),
                Message::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => text,
                    Err(_) => {
                        warn!("non-utf8 binary frame ignored");
                        continue;
                    }
                },
                Message::Ping(payload) => {
                    if let Some(conn) = self.inner.conn.read().await.as_ref() {
                        let _ = conn.send_pong(payload).await;
                    }
                    continue;
                }
                Message::Pong(_) | Message::Frame(_) => continue,
                Message::Close(_) => return Err(tungstenite::Error::ConnectionClosed.into()),
            };
            debug!(target: "td365::ws", "<< {text}");
            self.handle_frame(&text, login_id, token).await?;
        }
        Ok(())
    }

    async fn handle_frame(&self, text: &str, login_id: &str, token: &str) -> Result<()> {
        let message = match ServerMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                warn!("undecodable frame ({e}): {text}");
                return Ok(());
            }
        };

        match message {
            ServerMessage::ConnectResponse => {
                self.send(models::authentication(login_id, token)).await?;
            }
            ServerMessage::AuthenticationResponse { cid, result } => {
                if !result {
                    return Err(TdError::WsProtocol("authentication rejected".into()));
                }
                let previous = self.inner.connection_id.lock().unwrap().clone();
                if let Some(previous) = previous {
                    self.send(models::reconnect(&previous)).await?;
                }
                *self.inner.connection_id.lock().unwrap() = cid;
                self.send(models::options()).await?;
                let subscribed = self.inner.subscribed.read().await.clone();
                for quote_id in subscribed {
                    self.send(models::subscription("subscribe", quote_id)).await?;
                }
                let _ = self.inner.phase_tx.send(SessionPhase::Ready);
                info!("websocket session ready");
            }
            ServerMessage::ReconnectResponse { cid } => {
                *self.inner.connection_id.lock().unwrap() = cid;
            }
            ServerMessage::Heartbeat { counters } => {
                self.send(models::heartbeat_echo(&counters)).await?;
            }
            ServerMessage::SubscribeResponse { has_error, grouping, current } => {
                if has_error {
                    warn!("subscription rejected by server");
                    self.emit(Event::Error("subscription rejected".into())).await;
                    return Ok(());
                }
                let group = match Grouping::from_key(&grouping) {
                    Ok(group) => group,
                    Err(e) => {
                        warn!("subscribe ack with {e}");
                        return Ok(());
                    }
                };
                let mut ticks = Vec::with_capacity(current.len());
                for line in &current {
                    match Tick::parse(line, group) {
                        Ok(tick) => ticks.push(tick),
                        Err(e) => warn!("bad snapshot tick ({e}): {line}"),
                    }
                }
                self.emit(Event::SubscribeAck(ticks)).await;
            }
            ServerMessage::PriceData { groups } => {
                self.dispatch_prices(&groups).await;
            }
            ServerMessage::AccountSummary { payload } => {
                // Platform 0 is a non-trading placeholder the venue emits.
                if payload["PlatformID"].as_i64() == Some(0) {
                    return Ok(());
                }
                match serde_json::from_value::<AccountSummary>(payload) {
                    Ok(summary) => self.emit(Event::AccountSummary(summary)).await,
                    Err(e) => warn!("undecodable account summary: {e}"),
                }
            }
            ServerMessage::AccountDetails { payload } => {
                match serde_json::from_value::<AccountDetails>(payload) {
                    Ok(details) => self.emit(Event::AccountDetails(details)).await,
                    Err(e) => warn!("undecodable account details: {e}"),
                }
            }
            ServerMessage::TradeEstablished { payload } => {
                self.emit(Event::TradeEstablished(TradeEstablished(payload))).await;
            }
            ServerMessage::Unknown { tag, raw } => {
                warn!("unhandled message tag {tag:?}: {raw}");
            }
        }
        Ok(())
    }

    /// A price frame carries one array of CSV records per grouping key,
    /// e.g. `{"sp": [...], "gp": [...]}`; records are emitted in document
    /// order.
    async fn dispatch_prices(&self, groups: &Value) {
        let Some(map) = groups.as_object() else {
            return;
        };
        for (key, lines) in map {
            let Ok(group) = Grouping::from_key(key) else {
                debug!("unrecognized grouping key {key:?}");
                continue;
            };
            let Some(lines) = lines.as_array() else {
                continue;
            };
            for line in lines {
                let Some(line) = line.as_str() else {
                    continue;
                };
                match Tick::parse(line, group) {
                    Ok(tick) => self.emit(Event::Tick(tick)).await,
                    Err(e) => warn!("bad tick ({e}): {line}"),
                }
            }
        }
    }

    async fn send(&self, frame: Value) -> Result<()> {
        let text = frame.to_string();
        debug!(target: "td365::ws", ">> {text}");
        let conn = self.inner.conn.read().await;
        match conn.as_ref() {
            Some(conn) => conn.send_text(text).await,
            None => Err(TdError::WsProtocol("not connected".into())),
        }
    }

    async fn emit(&self, event: Event) {
        if self.inner.events.send(event).await.is_err() {
            debug!("event receiver dropped");
        }
    }
}

/// Errors after which the session is resumable: the venue closing the
/// socket, a truncated TLS stream, or aborted reads.
fn is_continuable(err: &tungstenite::Error) -> bool {
    use std::io::ErrorKind;
    use tungstenite::error::ProtocolError;
    match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => true,
        tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => true,
        tungstenite::Error::Io(e) => matches!(
            e.kind(),
            ErrorKind::UnexpectedEof
                | ErrorKind::ConnectionAborted
                | ErrorKind::ConnectionReset
                | ErrorKind::BrokenPipe
                | ErrorKind::TimedOut
        ),
        _ => false,
    }
}
