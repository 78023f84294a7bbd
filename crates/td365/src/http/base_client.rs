use std::sync::{Mutex, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, COOKIE};
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::common::{consts, proxy, tls};
use crate::error::{Result, TdError};
use crate::http::cookies::{Cookie, CookieJar};

/// Responses are capped at 128 MiB.
const BODY_LIMIT: usize = 128 * 1024 * 1024;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// One client per host: browser-shaped default headers, an owned cookie
/// jar, gzip inflate and manual redirect handling (the landing chain is
/// walked by the caller).
#[derive(Debug)]
pub struct HostClient {
    base: String,
    host: String,
    client: reqwest::Client,
    default_headers: RwLock<HeaderMap>,
    jar: Mutex<CookieJar>,
}

impl HostClient {
    /// HTTPS client for a venue host.
    pub fn new(host: &str) -> Result<Self> {
        Self::with_base(Url::parse(&format!("https://{host}"))?)
    }

    /// Client for an arbitrary base URL; plain `http` is accepted so tests
    /// can run against a local server.
    pub fn with_base(base: Url) -> Result<Self> {
        let host = base
            .host_str()
            .ok_or_else(|| TdError::Extract { what: "host", context: base.to_string() })?
            .to_string();
        let host_header = match base.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.clone(),
        };

        let mut builder = reqwest::Client::builder()
            .use_preconfigured_tls((*tls::client_config()).clone())
            .redirect(reqwest::redirect::Policy::none())
            .gzip(true)
            .connect_timeout(CONNECT_TIMEOUT);
        if let Some(proxy_url) = proxy::proxy_override()? {
            debug!("routing {host} through proxy {proxy_url}");
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let client = builder.build()?;

        let jar = CookieJar::load(format!("{host}.cookies"));

        let http = HostClient {
            base: base.as_str().trim_end_matches('/').to_string(),
            host,
            client,
            default_headers: RwLock::new(HeaderMap::new()),
            jar: Mutex::new(jar),
        };
        http.set_default_header("User-Agent", consts::USER_AGENT);
        http.set_default_header("Accept", "*/*");
        http.set_default_header("Accept-Language", "en-US,en;q=0.5");
        http.set_default_header("Content-Type", "application/json; charset=utf-8");
        http.set_default_header("Connection", "keep-alive");
        http.set_default_header("Host", &host_header);
        Ok(http)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Install or replace a default header applied to every request.
    pub fn set_default_header(&self, name: &str, value: &str) {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.default_headers.write().unwrap().insert(name, value);
            }
            _ => warn!("unusable default header {name}: {value}"),
        }
    }

    /// Look up a cookie this host has set.
    pub fn cookie(&self, name: &str) -> Cookie {
        self.jar.lock().unwrap().get(name)
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        self.send(Method::GET, path, None, None).await
    }

    pub async fn post(&self, path: &str, body: Option<String>) -> Result<HttpResponse> {
        self.send(Method::POST, path, None, body).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        extra_headers: Option<HeaderMap>,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        let url = format!("{}{}", self.base, path);

        let mut headers = self.default_headers.read().unwrap().clone();
        if let Some(extra) = extra_headers {
            for (name, value) in extra.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }
        match self.jar.lock().unwrap().cookie_header() {
            Some(combined) => {
                if let Ok(value) = HeaderValue::from_str(&combined) {
                    headers.insert(COOKIE, value);
                }
            }
            None => {
                headers.remove(COOKIE);
            }
        }

        let mut request = self.client.request(method.clone(), url).headers(headers);
        match body {
            Some(body) => {
                debug!(target: "td365::http", ">> {method} {path} {body}");
                request = request.body(body);
            }
            None => {
                debug!(target: "td365::http", ">> {method} {path}");
                // The venue rejects POSTs without an explicit length.
                if method == Method::POST {
                    request = request.header(CONTENT_LENGTH, 0);
                }
            }
        }

        let mut response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        {
            let mut jar = self.jar.lock().unwrap();
            jar.update(&headers);
            if let Err(e) = jar.save() {
                warn!("could not persist cookie jar for {}: {e}", self.host);
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > BODY_LIMIT {
                return Err(TdError::BodyTooLarge { limit: BODY_LIMIT });
            }
            body.extend_from_slice(&chunk);
        }
        debug!(target: "td365::http", "<< {status} {} bytes", body.len());

        Ok(HttpResponse { status, headers, body })
    }
}
