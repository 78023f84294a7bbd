use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::info;

use td_types::{
    AccountDetails, AccountSummary, Candle, Event, Market, MarketDetailsResponse, MarketGroup,
    Tick, TradeEstablished, TradeRequest, TradeResponse,
};

use crate::auth::{self, Credential, WebDetail};
use crate::error::Result;
use crate::http::client::TdRestClient;
use crate::websocket::TdWebSocketClient;

const EVENT_QUEUE_DEPTH: usize = 1024;

/// Consumer callbacks, one per stream event. Every method has a default
/// no-op body so a handler only implements what it cares about.
pub trait EventHandler {
    fn on_tick(&mut self, _tick: Tick) {}
    fn on_account_summary(&mut self, _summary: AccountSummary) {}
    fn on_account_details(&mut self, _details: AccountDetails) {}
    fn on_trade_established(&mut self, _trade: TradeEstablished) {}
    fn on_subscribe_ack(&mut self, _ticks: Vec<Tick>) {}
    fn on_error(&mut self, _message: String) {}
}

/// The venue client: one REST session plus one streaming session behind a
/// single object.
///
/// `connect*` returns once the stream has authenticated. Events are
/// consumed either by polling [`Td365::wait`] or by handing an
/// [`EventHandler`] to [`Td365::run_events`]; both see the same ordered
/// stream.
pub struct Td365 {
    detail: WebDetail,
    shutdown: Arc<AtomicBool>,
    rest: TdRestClient,
    ws: TdWebSocketClient,
    events: Mutex<mpsc::Receiver<Event>>,
    ws_task: JoinHandle<()>,
    keepalive_task: JoinHandle<()>,
}

impl Td365 {
    /// Connect to the anonymous one-click demo.
    pub async fn connect() -> Result<Td365> {
        Self::connect_with(auth::authenticate_one_click()?).await
    }

    /// Connect with portal credentials, selecting `account_id`.
    pub async fn connect_with_credentials(
        username: &str,
        password: &str,
        account_id: &str,
    ) -> Result<Td365> {
        let credential = Credential::new(username, password, account_id);
        Self::connect_with(auth::authenticate(&credential).await?).await
    }

    async fn connect_with(detail: WebDetail) -> Result<Td365> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (rest, auth_info) = TdRestClient::connect(&detail.platform_url).await?;

        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let ws = TdWebSocketClient::new(event_tx.clone(), shutdown.clone());
        let ws_task = tokio::spawn({
            let ws = ws.clone();
            let sock_host = detail.sock_host.clone();
            async move {
                ws.run(sock_host, auth_info.login_id, auth_info.token).await;
            }
        });
        ws.wait_ready().await?;

        let keepalive_task = rest.spawn_session_keepalive(shutdown.clone(), event_tx);
        info!("connected ({:?})", detail.account_type);

        Ok(Td365 {
            detail,
            shutdown,
            rest,
            ws,
            events: Mutex::new(event_rx),
            ws_task,
            keepalive_task,
        })
    }

    pub fn web_detail(&self) -> &WebDetail {
        &self.detail
    }

    pub async fn subscribe(&self, quote_id: i32) -> Result<()> {
        self.ws.subscribe(quote_id).await
    }

    pub async fn unsubscribe(&self, quote_id: i32) -> Result<()> {
        self.ws.unsubscribe(quote_id).await
    }

    pub async fn get_market_super_group(&self) -> Result<Vec<MarketGroup>> {
        self.rest.get_market_super_group().await
    }

    pub async fn get_market_group(&self, super_group_id: i32) -> Result<Vec<MarketGroup>> {
        self.rest.get_market_group(super_group_id).await
    }

    pub async fn get_market_quote(&self, group_id: i32) -> Result<Vec<Market>> {
        self.rest.get_market_quote(group_id).await
    }

    pub async fn get_market_details(&self, market_id: i32) -> Result<MarketDetailsResponse> {
        self.rest.get_market_details(market_id).await
    }

    /// Place a trade: market details refresh, simulated validation pass,
    /// then the live request. The simulation gates the live call.
    pub async fn trade(&self, request: TradeRequest) -> Result<TradeResponse> {
        self.rest.get_market_details(request.market_id).await?;
        self.rest.sim_trade(&request).await?;
        self.rest.trade(&request).await
    }

    pub async fn backfill(&self, market_id: i32, count: usize) -> Result<Vec<Candle>> {
        self.rest.backfill(market_id, count).await
    }

    /// Next event off the stream; `Event::Timeout` when the deadline
    /// passes first, `Event::ConnectionClosed` once the session is gone.
    pub async fn wait(&self, timeout: Option<Duration>) -> Event {
        let mut events = self.events.lock().await;
        match timeout {
            None => events.recv().await.unwrap_or(Event::ConnectionClosed),
            Some(deadline) => match tokio::time::timeout(deadline, events.recv()).await {
                Err(_) => Event::Timeout,
                Ok(Some(event)) => event,
                Ok(None) => Event::ConnectionClosed,
            },
        }
    }

    /// Drain the stream into `handler` until the session closes.
    pub async fn run_events<H: EventHandler>(&self, handler: &mut H) {
        loop {
            match self.wait(None).await {
                Event::Tick(tick) => handler.on_tick(tick),
                Event::AccountSummary(summary) => handler.on_account_summary(summary),
                Event::AccountDetails(details) => handler.on_account_details(details),
                Event::TradeEstablished(trade) => handler.on_trade_established(trade),
                Event::SubscribeAck(ticks) => handler.on_subscribe_ack(ticks),
                Event::Error(message) => handler.on_error(message),
                Event::Timeout => {}
                Event::ConnectionClosed => break,
            }
        }
    }

    /// Tear down both sessions.
    pub async fn close(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.ws.close().await;
        self.keepalive_task.abort();
    }
}

impl Drop for Td365 {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.keepalive_task.abort();
        self.ws_task.abort();
    }
}
