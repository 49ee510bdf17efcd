/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 14/10/26
 ******************************************************************************/
use crate::application::models::identity::SteamId;
use crate::error::ClientError;
use crate::session::interface::WebSession;
use async_trait::async_trait;
use std::fmt;
use tokio::sync::{mpsc, oneshot};

/// What a single log-on call is allowed to use. Exactly one of `password`
/// or `login_key` is set by the orchestrator.
#[derive(Clone, Default)]
pub struct LogOnDetails {
    pub account_name: String,
    pub password: Option<String>,
    pub login_key: Option<String>,
    pub two_factor_code: Option<String>,
}

impl fmt::Debug for LogOnDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("LogOnDetails")
            .field("account_name", &self.account_name)
            .field("password", &mask(&self.password))
            .field("login_key", &mask(&self.login_key))
            .field("two_factor_code", &mask(&self.two_factor_code))
            .finish()
    }
}

/// Second-factor challenge raised by Steam mid log-on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardChallenge {
    /// Mail domain when the code was sent by e-mail, `None` for the mobile authenticator.
    pub domain: Option<String>,
    pub last_code_wrong: bool,
}

impl fmt::Display for GuardChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Steam Guard required")?;
        if let Some(domain) = &self.domain {
            write!(f, " ({})", domain)?;
        }
        if self.last_code_wrong {
            write!(f, " (last code wrong)")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ClientEvent {
    SteamGuard {
        challenge: GuardChallenge,
        reply: oneshot::Sender<String>,
    },
    LoginKey(String),
    LoggedOn {
        steam_id: Option<SteamId>,
    },
    WebSession(WebSession),
    Error(ClientError),
}

/// Connection to the Steam network. Every `log_on` call opens a fresh
/// connection and reports its progress on the returned channel; the channel
/// stays open after the web session is issued so later login keys still arrive.
#[async_trait]
pub trait SteamClient: Send + Sync {
    async fn log_on(&self, details: LogOnDetails) -> mpsc::Receiver<ClientEvent>;
}
