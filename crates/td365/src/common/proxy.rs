use url::Url;

use crate::error::{Result, TdError};

const DEFAULT_PROXY_PORT: u16 = 8080;

/// Interception seam: when `PROXY` is set, every HTTP and WS connection is
/// routed through the given endpoint instead of the resolved host.
pub fn proxy_override() -> Result<Option<Url>> {
    match std::env::var("PROXY") {
        Ok(raw) => parse_proxy(&raw).map(Some),
        Err(_) => Ok(None),
    }
}

/// Accepts `host`, `host:port` or a full URL; port defaults to 8080.
pub fn parse_proxy(raw: &str) -> Result<Url> {
    let normalized = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    let mut url = Url::parse(&normalized)?;
    if url.port().is_none() {
        url.set_port(Some(DEFAULT_PROXY_PORT))
            .map_err(|_| TdError::Extract { what: "proxy port", context: raw.to_string() })?;
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_default_port() {
        let url = parse_proxy("127.0.0.1").unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn host_port_form() {
        let url = parse_proxy("proxy.local:9000").unwrap();
        assert_eq!(url.host_str(), Some("proxy.local"));
        assert_eq!(url.port(), Some(9000));
    }

    #[test]
    fn url_form_keeps_port() {
        let url = parse_proxy("http://10.0.0.2:8081").unwrap();
        assert_eq!(url.port(), Some(8081));
    }
}
