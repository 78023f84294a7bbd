use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use url::Url;

use td_types::{Candle, Event, Market, MarketDetailsResponse, MarketGroup, TradeRequest, TradeResponse};

use crate::common::consts;
use crate::error::{Result, TdError};
use crate::http::base_client::HostClient;
use crate::http::models::{
    ChartData, DResponse, MarketDetailsReq, MarketGroupReq, MarketQuoteReq, SessionStatus, TradeReq,
};

/// The landing page may bounce through at most this many redirects.
const MAX_DEPTH: usize = 4;

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(60);

const SUPER_GROUP_PATH: &str = "/UTSAPI.asmx/GetMarketSuperGroup";
const GROUP_PATH: &str = "/UTSAPI.asmx/GetMarketGroup";
const QUOTE_PATH: &str = "/UTSAPI.asmx/GetMarketQuote";
const TRADE_PATH: &str = "/UTSAPI.asmx/RequestTrade";
const SIM_TRADE_PATH: &str = "/UTSAPI.asmx/RequestTradeSimulate";
const SESSION_PATH: &str = "/UTSAPI.asmx/UpdateClientSessionID";

/// Session identity handed to the WS layer after the landing page has been
/// opened: the OTS-keyed cookie value plus the login id from the page.
#[derive(Debug, Clone)]
pub struct AuthInfo {
    pub token: String,
    pub login_id: String,
}

/// Typed calls against the venue's site API, bound to one authenticated
/// platform session.
#[derive(Clone, Debug)]
pub struct TdRestClient {
    client: Arc<HostClient>,
    account_id: String,
    market_details_path: String,
}

impl TdRestClient {
    /// Open the platform landing page and mint a session.
    ///
    /// Follows the venue's 302 chain, pulls `ots` from the final URL and the
    /// hidden login/account fields from the final HTML, then reads the
    /// session token out of the cookie the chain has set.
    pub async fn connect(platform_url: &Url) -> Result<(Self, AuthInfo)> {
        let origin = origin_of(platform_url)?;
        let client = Arc::new(HostClient::with_base(Url::parse(&origin)?)?);

        let (final_target, body) = Self::walk_landing(&client, target_of(platform_url)).await?;
        let ots = extract_ots(&final_target)?;
        let login_id = extract_hidden_field(&body, "hfLoginID")?;
        let account_id = extract_hidden_field(&body, "hfAccountID")?;

        let token = client.cookie(&ots);
        if token.value.is_empty() {
            return Err(TdError::Extract { what: "session token cookie", context: ots });
        }

        client.set_default_header("Origin", &origin);
        client.set_default_header("Referer", &format!("{origin}/Advanced.aspx?ots={ots}"));
        client.set_default_header("Content-Type", "application/json; charset=utf-8");
        client.set_default_header("X-Requested-With", "XMLHttpRequest");

        info!("platform session open for account {account_id}");
        Ok((
            TdRestClient {
                client,
                market_details_path: format!(
                    "/UTSAPI.asmx/GetMarketDetails?AccountID={account_id}"
                ),
                account_id,
            },
            AuthInfo { token: token.value, login_id },
        ))
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    async fn walk_landing(client: &HostClient, start: String) -> Result<(String, String)> {
        let mut target = start.clone();
        for _ in 0..=MAX_DEPTH {
            let response = client.get(&target).await?;
            if response.status == StatusCode::OK {
                return Ok((target, response.text()));
            }
            if response.status != StatusCode::FOUND {
                return Err(TdError::Status {
                    path: target,
                    status: response.status.as_u16(),
                    body: snippet(&response.text()),
                });
            }
            let location = response
                .headers
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| TdError::Extract { what: "Location", context: target.clone() })?;
            target = normalize_location(location);
        }
        Err(TdError::MaxRedirectDepth { start, max: MAX_DEPTH })
    }

    pub async fn get_market_super_group(&self) -> Result<Vec<MarketGroup>> {
        self.post_d(SUPER_GROUP_PATH, Some("{}".to_string())).await
    }

    pub async fn get_market_group(&self, super_group_id: i32) -> Result<Vec<MarketGroup>> {
        let body = serde_json::to_string(&MarketGroupReq { super_group_id })?;
        self.post_d(GROUP_PATH, Some(body)).await
    }

    pub async fn get_market_quote(&self, group_id: i32) -> Result<Vec<Market>> {
        let body = serde_json::to_string(&MarketQuoteReq::for_group(group_id))?;
        self.post_d(QUOTE_PATH, Some(body)).await
    }

    pub async fn get_market_details(&self, market_id: i32) -> Result<MarketDetailsResponse> {
        let body = serde_json::to_string(&MarketDetailsReq { market_id })?;
        self.post_d(self.market_details_path.as_str(), Some(body)).await
    }

    /// Validation-only pass of a trade; the venue gates `RequestTrade` on it.
    pub async fn sim_trade(&self, request: &TradeRequest) -> Result<()> {
        let body = serde_json::to_string(&TradeReq::from(request))?;
        self.post_d::<serde_json::Value>(SIM_TRADE_PATH, Some(body)).await?;
        Ok(())
    }

    pub async fn trade(&self, request: &TradeRequest) -> Result<TradeResponse> {
        let body = serde_json::to_string(&TradeReq::from(request))?;
        self.post_d(TRADE_PATH, Some(body)).await
    }

    /// Pull up to `count` one-minute mid-price bars from the chart host.
    pub async fn backfill(&self, market_id: i32, count: usize) -> Result<Vec<Candle>> {
        let chart = HostClient::new(consts::CHART_HOST)?;
        let path = format!("/data/minute/{market_id}/mid?l={count}");
        let response = chart.get(&path).await?;
        if response.status != StatusCode::OK {
            return Err(TdError::Status {
                path,
                status: response.status.as_u16(),
                body: snippet(&response.text()),
            });
        }
        let payload: ChartData = response.json()?;
        let mut candles = Vec::with_capacity(payload.data.len());
        for line in &payload.data {
            candles.push(Candle::parse(line)?);
        }
        Ok(candles)
    }

    /// One session ping; returns the venue's session status (0 = alive).
    pub async fn update_client_session(&self) -> Result<i32> {
        let response = self.client.post(SESSION_PATH, None).await?;
        if response.status != StatusCode::OK {
            return Err(TdError::Status {
                path: SESSION_PATH.to_string(),
                status: response.status.as_u16(),
                body: snippet(&response.text()),
            });
        }
        let wrapped: DResponse<SessionStatus> = response.json()?;
        Ok(wrapped.d.status)
    }

    /// Keep the platform session alive with a ping every 60 s.
    ///
    /// Non-200 replies and dropped connections are retried immediately; a
    /// non-zero session status means the venue logged us out, which is
    /// surfaced as an error event and ends the loop.
    pub fn spawn_session_keepalive(
        &self,
        shutdown: Arc<AtomicBool>,
        events: mpsc::Sender<Event>,
    ) -> JoinHandle<()> {
        let rest = self.clone();
        tokio::spawn(async move {
            loop {
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                let delay = match rest.update_client_session().await {
                    Ok(0) => KEEPALIVE_INTERVAL,
                    Ok(status) => {
                        error!("logged out by server, session status {status}");
                        let _ = events
                            .send(Event::Error(format!("logged out by server (status {status})")))
                            .await;
                        break;
                    }
                    Err(TdError::Status { status, .. }) => {
                        warn!("session ping returned {status}, retrying");
                        Duration::ZERO
                    }
                    Err(TdError::Http(e)) => {
                        warn!("session ping failed: {e}, retrying");
                        Duration::ZERO
                    }
                    Err(e) => {
                        error!("session keep-alive stopped: {e}");
                        let _ = events.send(Event::Error(e.to_string())).await;
                        break;
                    }
                };
                tokio::time::sleep(delay).await;
            }
            info!("session keep-alive exiting");
        })
    }

    async fn post_d<T: DeserializeOwned>(&self, path: &str, body: Option<String>) -> Result<T> {
        let response = self.client.post(path, body).await?;
        if response.status != StatusCode::OK {
            return Err(TdError::Status {
                path: path.to_string(),
                status: response.status.as_u16(),
                body: snippet(&response.text()),
            });
        }
        let value: serde_json::Value = serde_json::from_slice(&response.body)
            .map_err(|e| TdError::Extract { what: "json body", context: e.to_string() })?;
        let d = value
            .get("d")
            .cloned()
            .ok_or_else(|| TdError::Extract { what: "d", context: snippet(&response.text()) })?;
        serde_json::from_value(d)
            .map_err(|e| TdError::Extract { what: "d payload", context: e.to_string() })
    }
}

fn origin_of(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| TdError::Extract { what: "host", context: url.to_string() })?;
    Ok(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}

fn target_of(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

/// Redirect targets may be absolute; the venue never changes host, so the
/// path-and-query part is what gets followed.
fn normalize_location(location: &str) -> String {
    match Url::parse(location) {
        Ok(url) => target_of(&url),
        Err(_) => location.to_string(),
    }
}

fn extract_ots(target: &str) -> Result<String> {
    let query = target.split_once('?').map(|(_, q)| q).unwrap_or("");
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("ots=") {
            if !value.is_empty() {
                return Ok(value.to_string());
            }
        }
    }
    Err(TdError::Extract { what: "ots", context: target.to_string() })
}

fn extract_hidden_field(body: &str, id: &'static str) -> Result<String> {
    let marker = format!(r#"id="{id}" value=""#);
    let start = body
        .find(&marker)
        .ok_or_else(|| TdError::Extract { what: id, context: snippet(body) })?
        + marker.len();
    let len = body[start..]
        .find('"')
        .ok_or_else(|| TdError::Extract { what: id, context: snippet(&body[start..]) })?;
    Ok(body[start..start + len].to_string())
}

fn snippet(s: &str) -> String {
    s.chars().take(64).collect()
}
