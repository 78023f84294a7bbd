use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// OAuth token pair cached on disk between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub id_token: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expiry_time: DateTime<Utc>,
}

impl AuthToken {
    /// Read a cached token; a missing or unreadable cache is simply absent.
    pub fn load(path: &Path) -> Option<AuthToken> {
        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)
            .map_err(|e| anyhow::anyhow!("could not write {}: {e}", path.display()))?;
        Ok(())
    }

    pub fn expired(&self) -> bool {
        Utc::now() >= self.expiry_time
    }
}
