/// Browser identity sent on every HTTP request and WS upgrade; the venue
/// rejects unknown agents.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:136.0) Gecko/20100101 Firefox/136.0";

/// Short agent string the trade endpoint wants inside the request body.
pub const TRADE_USER_AGENT: &str = "Firefox (139.0)";

pub const OAUTH_TOKEN_HOST: &str = "td365.eu.auth0.com";
pub const PORTAL_API_HOST: &str = "portal-api.tradenation.com";
pub const CHART_HOST: &str = "charts.finsatechnology.com";

pub const PROD_SITE_HOST: &str = "https://traders.td365.com";
pub const PROD_API_HOST: &str = "https://prod-api.finsa.com.au";
pub const PROD_SOCK_HOST: &str = "https://prod-api.finsa.com.au";

pub const DEMO_SITE_HOST: &str = "https://demo.tradedirect365.com.au";
pub const DEMO_API_HOST: &str = "https://demo-api.finsa.com.au";
pub const DEMO_SOCK_HOST: &str = "https://demo-api.finsa.com.au";

// The "?aid=1026" is required for a valid login.
pub const ONE_CLICK_DEMO_URL: &str =
    "https://demo.tradedirect365.com/finlogin/OneClickDemo.aspx?aid=1026";

pub const AUTH0_CLIENT_ID: &str = "eeXrVwSMXPZ4pJpwStuNyiUa7XxGZRX9";
pub const AUTH0_REALM: &str = "Username-Password-Authentication";
pub const AUTH0_GRANT_TYPE: &str = "http://auth0.com/oauth/grant-type/password-realm";

/// Client version reported in the WS authentication frame.
pub const WS_CLIENT_VERSION: &str = "1.0.0.6";
