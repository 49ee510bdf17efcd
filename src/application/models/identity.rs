/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 14/10/26
 ******************************************************************************/
use crate::error::ResolutionError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const STEAM_ID64_DIGITS: usize = 17;

fn profile_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)steamcommunity\.com/profiles/(\d{17})(?:\D|$)")
            .expect("profile url pattern is valid")
    })
}

/// Canonical 64-bit Steam account identifier (SteamID64).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SteamId(u64);

impl SteamId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:017}", self.0)
    }
}

impl FromStr for SteamId {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve_identity(s)
    }
}

impl TryFrom<String> for SteamId {
    type Error = ResolutionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        resolve_identity(&value)
    }
}

impl From<SteamId> for String {
    fn from(id: SteamId) -> Self {
        id.to_string()
    }
}

fn is_steam_id64(s: &str) -> bool {
    s.len() == STEAM_ID64_DIGITS && s.bytes().all(|b| b.is_ascii_digit())
}

/// Accepts a bare SteamID64 or a `steamcommunity.com/profiles/<id>` URL.
/// Vanity (`/id/<name>`) URLs are not resolved.
pub fn resolve_identity(input: &str) -> Result<SteamId, ResolutionError> {
    let trimmed = input.trim();
    let digits = if is_steam_id64(trimmed) {
        Some(trimmed)
    } else {
        profile_url_pattern()
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    };

    digits
        .and_then(|d| d.parse::<u64>().ok())
        .map(SteamId)
        .ok_or_else(|| ResolutionError {
            input: trimmed.to_string(),
        })
}
