/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 14/10/26
 ******************************************************************************/
use crate::constants::DEFAULT_SESSION_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    #[serde(rename = "loginKey")]
    login_key: String,
}

/// Best-effort cache of the reusable login key, one JSON file per account.
///
/// Nothing here ever fails the caller: unreadable or malformed files read as
/// absent and write errors are logged and dropped.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

/// Maps an account name to a filesystem-safe record key.
pub fn session_key(account_name: &str) -> String {
    if account_name.is_empty() {
        return DEFAULT_SESSION_KEY.to_string();
    }
    account_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, account_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", session_key(account_name)))
    }

    pub async fn read(&self, account_name: &str) -> Option<String> {
        let path = self.record_path(account_name);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No stored login key at {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) if !record.login_key.is_empty() => Some(record.login_key),
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring malformed session file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Returns whether the key reached disk. Callers are not expected to branch on it.
    pub async fn write(&self, account_name: &str, login_key: &str) -> bool {
        let path = self.record_path(account_name);
        let record = SessionRecord {
            login_key: login_key.to_string(),
        };
        let body = match serde_json::to_string_pretty(&record) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to encode session record: {}", e);
                return false;
            }
        };
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!("Failed to create session dir {}: {}", self.dir.display(), e);
            return false;
        }
        match tokio::fs::write(&path, body).await {
            Ok(()) => {
                debug!("Stored login key at {}", path.display());
                true
            }
            Err(e) => {
                warn!("Failed to store login key at {}: {}", path.display(), e);
                false
            }
        }
    }
}
