use crate::application::models::identity::SteamId;
use std::fmt;

/// Cookie-bearing Steam Community web session, as handed out after log-on.
#[derive(Clone, PartialEq, Eq)]
pub struct WebSession {
    pub session_id: String,
    /// Raw `name=value` cookie pairs.
    pub cookies: Vec<String>,
}

impl WebSession {
    pub fn cookie_header(&self) -> String {
        let mut pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|c| !c.starts_with("sessionid="))
            .cloned()
            .collect();
        pairs.push(format!("sessionid={}", self.session_id));
        pairs.join("; ")
    }
}

impl fmt::Debug for WebSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSession")
            .field("session_id", &"[REDACTED]")
            .field("cookies", &self.cookies.len())
            .finish()
    }
}

/// Result of a successful login, owned by the runner for the rest of the run.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub account_name: String,
    pub steam_id: Option<SteamId>,
    pub web: WebSession,
}

impl fmt::Display for AuthenticatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"account_name\":\"{}\",\"steam_id\":{},\"web\":\"[REDACTED]\"}}",
            self.account_name,
            self.steam_id
                .map_or("null".to_string(), |id| format!("\"{}\"", id))
        )
    }
}
