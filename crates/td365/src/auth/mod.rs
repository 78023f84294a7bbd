pub mod credentials;
pub mod token;

use std::path::Path;

use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::info;
use url::Url;

use crate::common::consts;
use crate::error::{Result, TdError};
use crate::http::base_client::HostClient;

pub use credentials::Credential;
pub use token::AuthToken;

const TOKEN_CACHE: &str = "auth_token.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Demo,
    Prod,
    OneClick,
}

/// Where to find the platform once authenticated: the landing page plus the
/// site, API and socket hosts for the selected account.
#[derive(Debug, Clone)]
pub struct WebDetail {
    pub platform_url: Url,
    pub account_type: AccountType,
    pub site_host: Url,
    pub api_host: Url,
    pub sock_host: Url,
}

/// Anonymous one-click demo: fixed landing page, demo hosts, no portal round
/// trip.
pub fn authenticate_one_click() -> Result<WebDetail> {
    Ok(WebDetail {
        platform_url: Url::parse(consts::ONE_CLICK_DEMO_URL)?,
        account_type: AccountType::OneClick,
        site_host: Url::parse(consts::DEMO_SITE_HOST)?,
        api_host: Url::parse(consts::DEMO_API_HOST)?,
        sock_host: Url::parse(consts::DEMO_SOCK_HOST)?,
    })
}

/// Password-grant login: cached Auth0 token, portal account selection,
/// platform launch URL resolution.
pub async fn authenticate(credential: &Credential) -> Result<WebDetail> {
    let token = match AuthToken::load(Path::new(TOKEN_CACHE)) {
        Some(token) if !token.expired() => token,
        _ => {
            let token = login(credential).await?;
            token.save(Path::new(TOKEN_CACHE))?;
            token
        }
    };

    let portal = HostClient::new(consts::PORTAL_API_HOST)?;
    portal.set_default_header("Authorization", &format!("Bearer {}", token.access_token));

    let account = select_account(&portal, &credential.account_id).await?;
    let account_type = if account["accountType"] == "DEMO" {
        AccountType::Demo
    } else {
        AccountType::Prod
    };

    let link = account["button"]["linkTo"]
        .as_str()
        .ok_or_else(|| TdError::Extract { what: "button.linkTo", context: account.to_string() })?;
    let link = Url::parse(link)?;
    let platform_url = fetch_platform_url(&portal, &link).await?;
    info!("platform launch url resolved, account type {account_type:?}");

    let (site, api, sock) = match account_type {
        AccountType::Demo | AccountType::OneClick => {
            (consts::DEMO_SITE_HOST, consts::DEMO_API_HOST, consts::DEMO_SOCK_HOST)
        }
        AccountType::Prod => {
            (consts::PROD_SITE_HOST, consts::PROD_API_HOST, consts::PROD_SOCK_HOST)
        }
    };

    Ok(WebDetail {
        platform_url,
        account_type,
        site_host: Url::parse(site)?,
        api_host: Url::parse(api)?,
        sock_host: Url::parse(sock)?,
    })
}

/// Exchange portal credentials for an Auth0 token pair.
async fn login(credential: &Credential) -> Result<AuthToken> {
    let client = HostClient::new(consts::OAUTH_TOKEN_HOST)?;
    let body = json!({
        "realm": consts::AUTH0_REALM,
        "client_id": consts::AUTH0_CLIENT_ID,
        "scope": "openid",
        "grant_type": consts::AUTH0_GRANT_TYPE,
        "username": credential.username,
        "password": credential.password,
    });
    let response = client.post("/oauth/token", Some(body.to_string())).await?;
    if response.status != StatusCode::OK {
        return Err(TdError::Auth(format!("login failed with status {}", response.status)));
    }

    let payload: Value = response.json()?;
    let access_token = required_str(&payload, "access_token")?;
    let id_token = required_str(&payload, "id_token")?;
    let expires_in = payload["expires_in"]
        .as_i64()
        .ok_or_else(|| TdError::Extract { what: "expires_in", context: "oauth response".into() })?;

    Ok(AuthToken {
        access_token,
        id_token,
        expiry_time: Utc::now() + Duration::seconds(expires_in),
    })
}

async fn select_account(portal: &HostClient, account_id: &str) -> Result<Value> {
    let response = portal.get("/TD365/user/accounts/").await?;
    if response.status != StatusCode::OK {
        return Err(TdError::Auth(format!(
            "account listing failed with status {}",
            response.status
        )));
    }
    let payload: Value = response.json()?;
    if let Some(results) = payload["results"].as_array() {
        for account in results {
            if account["account"] == account_id {
                return Ok(account.clone());
            }
        }
    }
    Err(TdError::Auth(format!("account not found: {account_id}")))
}

/// The portal's launch link answers with `{"url": ...}`, the actual landing
/// page.
async fn fetch_platform_url(portal: &HostClient, link: &Url) -> Result<Url> {
    let target = match link.query() {
        Some(query) => format!("{}?{query}", link.path()),
        None => link.path().to_string(),
    };
    let response = portal.get(&target).await?;
    if response.status != StatusCode::OK {
        return Err(TdError::Auth(format!(
            "GET {target} failed with status {}",
            response.status
        )));
    }
    let payload: Value = response.json()?;
    let url = required_str(&payload, "url")?;
    Ok(Url::parse(&url)?)
}

fn required_str(value: &Value, key: &'static str) -> Result<String> {
    value[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| TdError::Extract { what: key, context: "response body".into() })
}
