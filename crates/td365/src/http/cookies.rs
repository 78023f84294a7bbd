use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::{HeaderMap, SET_COOKIE};
use tracing::warn;

/// A single cookie. `expiry` of `None` means session-only: kept in memory,
/// never persisted with a deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expiry: Option<DateTime<Utc>>,
}

/// Per-host cookie store backed by a `<host>.cookies` file of
/// `name value expiry_seconds` lines (0 encodes session-only).
///
/// At most one cookie per name; a later `Set-Cookie` for the same name
/// replaces the earlier one.
#[derive(Debug)]
pub struct CookieJar {
    path: PathBuf,
    cookies: BTreeMap<String, Cookie>,
}

// RFC 1123 and the obsolete dash-separated layout still used by IIS.
const EXPIRES_FORMATS: [&str; 2] = ["%a, %d %b %Y %H:%M:%S GMT", "%a, %d-%b-%Y %H:%M:%S GMT"];

impl CookieJar {
    /// Open the jar, loading any persisted cookies for this host.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut cookies = BTreeMap::new();
        if let Ok(contents) = fs::read_to_string(&path) {
            for line in contents.lines() {
                let mut parts = line.split_whitespace();
                let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
                    continue;
                };
                let expiry = match parts.next().and_then(|s| s.parse::<i64>().ok()) {
                    Some(0) | None => None,
                    Some(secs) => DateTime::from_timestamp(secs, 0),
                };
                cookies.insert(
                    name.to_string(),
                    Cookie { name: name.to_string(), value: value.to_string(), expiry },
                );
            }
        }
        CookieJar { path, cookies }
    }

    /// Write the jar back to its backing file.
    pub fn save(&self) -> std::io::Result<()> {
        let mut out = fs::File::create(&self.path)?;
        for cookie in self.cookies.values() {
            let expiry = cookie.expiry.map_or(0, |t| t.timestamp());
            writeln!(out, "{} {} {}", cookie.name, cookie.value, expiry)?;
        }
        Ok(())
    }

    /// Ingest every `Set-Cookie` header of a response.
    pub fn update(&mut self, headers: &HeaderMap) {
        for raw in headers.get_all(SET_COOKIE) {
            let Ok(raw) = raw.to_str() else {
                warn!("non-ascii Set-Cookie header ignored");
                continue;
            };
            if let Some(cookie) = parse_set_cookie(raw) {
                self.cookies.insert(cookie.name.clone(), cookie);
            }
        }
    }

    /// Drop expired entries and combine the rest into a single `Cookie`
    /// header value, `name1=value1; name2=value2; ...`.
    pub fn cookie_header(&mut self) -> Option<String> {
        let now = Utc::now();
        self.cookies.retain(|_, c| c.expiry.map_or(true, |t| now < t));
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .values()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Look up a cookie by name; an empty sentinel is returned when absent.
    pub fn get(&self, name: &str) -> Cookie {
        self.cookies.get(name).cloned().unwrap_or_else(|| {
            warn!("cookie not found: {name}");
            Cookie::default()
        })
    }
}

fn parse_set_cookie(raw: &str) -> Option<Cookie> {
    let mut parts = raw.split(';');

    let pair = parts.next()?.trim();
    let Some((name, value)) = pair.split_once('=') else {
        warn!("malformed cookie pair in header: {raw}");
        return None;
    };
    let mut cookie =
        Cookie { name: name.to_string(), value: value.to_string(), expiry: None };

    for attr in parts {
        let attr = attr.trim();
        let Some((attr_name, attr_value)) = attr.split_once('=') else {
            continue;
        };
        match attr_name.to_ascii_lowercase().as_str() {
            "max-age" => match attr_value.trim().parse::<i64>() {
                Ok(secs) => cookie.expiry = Some(Utc::now() + chrono::Duration::seconds(secs)),
                Err(_) => warn!("malformed Max-Age in header: {raw}"),
            },
            "expires" => match parse_expires(attr_value.trim()) {
                Some(at) => cookie.expiry = Some(at),
                None => warn!("malformed Expires date in header: {raw}"),
            },
            _ => {}
        }
    }

    Some(cookie)
}

fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    EXPIRES_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_parses_both_layouts() {
        let a = parse_expires("Wed, 21 Oct 2026 07:28:00 GMT").unwrap();
        let b = parse_expires("Wed, 21-Oct-2026 07:28:00 GMT").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn attribute_garbage_keeps_the_pair() {
        let c = parse_set_cookie("sid=abc; Max-Age=soon; Path=/").unwrap();
        assert_eq!(c.name, "sid");
        assert_eq!(c.value, "abc");
        assert_eq!(c.expiry, None);
    }

    #[test]
    fn missing_equals_is_rejected() {
        assert!(parse_set_cookie("not a cookie").is_none());
    }
}
