use std::fmt;

/// TD365 portal credentials.
///
/// `username` and `password` are the portal login; `account_id` selects
/// which trading account to launch. All three are redacted in Debug.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub account_id: String,
}

impl Credential {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Credential {
            username: username.into(),
            password: password.into(),
            account_id: account_id.into(),
        }
    }

    /// Load credentials from the process environment.
    ///
    /// Expected variables: TD_USERNAME, TD_PASSWORD, TD_ACCOUNT_ID.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Credential {
            username: std::env::var("TD_USERNAME")?,
            password: std::env::var("TD_PASSWORD")?,
            account_id: std::env::var("TD_ACCOUNT_ID")?,
        })
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .field("account_id", &"<redacted>")
            .finish()
    }
}
