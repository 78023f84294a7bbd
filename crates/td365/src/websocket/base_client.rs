use std::time::Duration;

use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::USER_AGENT;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Bytes, Message};
use tokio_tungstenite::{client_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::common::{consts, proxy, tls};
use crate::error::{Result, TdError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);
const WRITE_QUEUE: usize = 256;

pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Write half of a live connection. Sends are serialized through a
/// dedicated writer task; the reader half stays with the session loop.
pub struct WsConnection {
    write_tx: mpsc::Sender<Message>,
}

/// Open a connection to the venue's socket host at path `/`.
///
/// `wss`/`https` schemes negotiate TLS with the shared process config
/// (SNI from the URL host); plain `ws`/`http` is kept for tests. The
/// upgrade request carries the browser User-Agent. A `PROXY` override
/// redirects only where the TCP connection is dialed; the TLS choice,
/// SNI and handshake Host stay those of the real target.
pub async fn connect(url: &Url) -> Result<(WsReader, WsConnection)> {
    let target = ws_url(url)?;
    let mut request = target.as_str().into_client_request()?;
    request
        .headers_mut()
        .insert(USER_AGENT, HeaderValue::from_static(consts::USER_AGENT));

    let (dial_host, dial_port) = dial_endpoint(&target)?;
    let tcp = timeout(CONNECT_TIMEOUT, TcpStream::connect((dial_host.as_str(), dial_port)))
        .await
        .map_err(|_| TdError::Timeout)?
        .map_err(|e| TdError::Ws(tungstenite::Error::Io(e)))?;

    let connector = Connector::Rustls(tls::client_config());
    let (stream, _response) = timeout(
        CONNECT_TIMEOUT,
        client_async_tls_with_config(request, tcp, None, Some(connector)),
    )
    .await
    .map_err(|_| TdError::Timeout)??;

    let (mut sink, reader) = stream.split();
    let (write_tx, mut write_rx) = mpsc::channel::<Message>(WRITE_QUEUE);
    tokio::spawn(async move {
        while let Some(message) = write_rx.recv().await {
            let closing = matches!(message, Message::Close(_));
            if sink.send(message).await.is_err() {
                break;
            }
            if closing {
                let _ = sink.flush().await;
                break;
            }
        }
    });

    Ok((reader, WsConnection { write_tx }))
}

impl WsConnection {
    pub async fn send_text(&self, data: String) -> Result<()> {
        // Fast path first; fall back to an awaited send under backpressure.
        match self.write_tx.try_send(Message::Text(data.clone().into())) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => self
                .write_tx
                .send(Message::Text(data.into()))
                .await
                .map_err(|_| TdError::WsProtocol("websocket writer closed".into())),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(TdError::WsProtocol("websocket writer closed".into()))
            }
        }
    }

    pub async fn send_pong(&self, payload: Bytes) -> Result<()> {
        self.write_tx
            .send(Message::Pong(payload))
            .await
            .map_err(|_| TdError::WsProtocol("websocket writer closed".into()))
    }

    /// Normal closure with a short grace period.
    pub async fn close(&self) {
        let _ = timeout(CLOSE_TIMEOUT, self.write_tx.send(Message::Close(None))).await;
    }
}

/// The socket host is given as an https origin; the handshake happens on
/// the matching ws scheme at `/`.
fn ws_url(url: &Url) -> Result<Url> {
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    let host = url
        .host_str()
        .ok_or_else(|| TdError::Extract { what: "host", context: url.to_string() })?;
    let rendered = match url.port() {
        Some(port) => format!("{scheme}://{host}:{port}/"),
        None => format!("{scheme}://{host}/"),
    };
    Ok(Url::parse(&rendered)?)
}

/// Where the TCP connection is dialed: the `PROXY` endpoint when set,
/// otherwise the target itself.
fn dial_endpoint(target: &Url) -> Result<(String, u16)> {
    if let Some(proxy_url) = proxy::proxy_override()? {
        let host = proxy_url
            .host_str()
            .ok_or_else(|| TdError::Extract { what: "host", context: proxy_url.to_string() })?;
        return Ok((host.to_string(), proxy_url.port_or_known_default().unwrap_or(8080)));
    }
    let host = target
        .host_str()
        .ok_or_else(|| TdError::Extract { what: "host", context: target.to_string() })?;
    let port = target
        .port_or_known_default()
        .unwrap_or(if target.scheme() == "wss" { 443 } else { 80 });
    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_origin_becomes_wss_root() {
        let url = Url::parse("https://demo-api.finsa.com.au").unwrap();
        assert_eq!(ws_url(&url).unwrap().as_str(), "wss://demo-api.finsa.com.au/");
    }

    #[test]
    fn plain_http_stays_plain_ws() {
        let url = Url::parse("http://127.0.0.1:9100").unwrap();
        assert_eq!(ws_url(&url).unwrap().as_str(), "ws://127.0.0.1:9100/");
    }

    #[test]
    fn dial_defaults_to_the_target_port() {
        let secure = ws_url(&Url::parse("https://demo-api.finsa.com.au").unwrap()).unwrap();
        assert_eq!(dial_endpoint(&secure).unwrap(), ("demo-api.finsa.com.au".to_string(), 443));
        let local = ws_url(&Url::parse("http://127.0.0.1:9100").unwrap()).unwrap();
        assert_eq!(dial_endpoint(&local).unwrap(), ("127.0.0.1".to_string(), 9100));
    }
}
