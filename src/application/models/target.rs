use crate::application::models::identity::SteamId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One profile to comment on. An empty `message` means "use the run's default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub steam_id: SteamId,
    pub message: String,
}

impl Target {
    pub fn new(steam_id: SteamId, message: impl Into<String>) -> Self {
        Self {
            steam_id,
            message: message.into(),
        }
    }

    pub fn message_or<'a>(&'a self, default_message: &'a str) -> &'a str {
        if self.message.is_empty() {
            default_message
        } else {
            &self.message
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"steam_id\":\"{}\",\"message\":{}}}",
            self.steam_id,
            serde_json::Value::String(self.message.clone())
        )
    }
}

/// Expands a single profile into `count` identical targets (at least one).
pub fn repeat_profile(steam_id: SteamId, message: &str, count: usize) -> Vec<Target> {
    (0..count.max(1))
        .map(|_| Target::new(steam_id, message))
        .collect()
}
