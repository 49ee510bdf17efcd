use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use steam_commenter::application::models::identity::SteamId;
use steam_commenter::config::{CommunityConfig, Config, Credentials, LoginConfig, PacingConfig};
use steam_commenter::error::{ClientError, PostError};
use steam_commenter::session::guard::CodeProvider;
use steam_commenter::session::interface::{AuthenticatedSession, WebSession};
use steam_commenter::storage::session_store::SessionStore;
use steam_commenter::transport::client::{
    ClientEvent, GuardChallenge, LogOnDetails, SteamClient,
};
use steam_commenter::transport::http_client::CommentPoster;
use tokio::sync::{mpsc, oneshot};

pub enum Step {
    WebSession,
    LoggedOn,
    LoginKey(&'static str),
    Fail(&'static str),
    Guard,
}

/// Steam client fake: each `log_on` plays the next script.
#[derive(Default)]
pub struct ScriptedClient {
    scripts: Mutex<Vec<Vec<Step>>>,
    pub calls: Mutex<Vec<LogOnDetails>>,
    pub guard_codes: Arc<Mutex<Vec<String>>>,
    peek: Option<(SessionStore, String)>,
    pub stored_at_call: Mutex<Vec<Option<String>>>,
}

impl ScriptedClient {
    pub fn new(mut scripts: Vec<Vec<Step>>) -> Self {
        scripts.reverse();
        Self {
            scripts: Mutex::new(scripts),
            ..Self::default()
        }
    }

    /// Records what the store holds for `account` at the start of every log-on.
    pub fn peeking(mut self, store: SessionStore, account: &str) -> Self {
        self.peek = Some((store, account.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call(&self, i: usize) -> LogOnDetails {
        self.calls.lock().unwrap()[i].clone()
    }
}

#[async_trait]
impl SteamClient for ScriptedClient {
    async fn log_on(&self, details: LogOnDetails) -> mpsc::Receiver<ClientEvent> {
        if let Some((store, account)) = &self.peek {
            let stored = store.read(account).await;
            self.stored_at_call.lock().unwrap().push(stored);
        }
        self.calls.lock().unwrap().push(details);
        let script = self.scripts.lock().unwrap().pop().unwrap_or_default();
        let codes = self.guard_codes.clone();
        let (tx, rx) = mpsc::channel(8);

        tokio::spawn(async move {
            for step in script {
                let event = match step {
                    Step::WebSession => ClientEvent::WebSession(WebSession {
                        session_id: "sid".to_string(),
                        cookies: vec!["steamLoginSecure=x".to_string()],
                    }),
                    Step::LoggedOn => ClientEvent::LoggedOn {
                        steam_id: "76561197960287930".parse().ok(),
                    },
                    Step::LoginKey(key) => ClientEvent::LoginKey(key.to_string()),
                    Step::Fail(msg) => ClientEvent::Error(ClientError::new(msg)),
                    Step::Guard => {
                        let (reply, answer) = oneshot::channel();
                        let event = ClientEvent::SteamGuard {
                            challenge: GuardChallenge::default(),
                            reply,
                        };
                        if tx.send(event).await.is_err() {
                            return;
                        }
                        match answer.await {
                            Ok(code) => codes.lock().unwrap().push(code),
                            Err(_) => return,
                        }
                        continue;
                    }
                };
                if tx.send(event).await.is_err() {
                    return;
                }
            }
        });
        rx
    }
}

/// Stands in for the terminal prompt.
pub struct TypedCode(pub &'static str);

#[async_trait]
impl CodeProvider for TypedCode {
    fn name(&self) -> &'static str {
        "typed"
    }

    async fn provide(&self, _challenge: &GuardChallenge) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// Comment transport fake that fails for a chosen set of profiles.
#[derive(Default)]
pub struct RecordingPoster {
    pub failing: HashSet<SteamId>,
    pub posted: Mutex<Vec<(SteamId, String)>>,
}

#[async_trait]
impl CommentPoster for RecordingPoster {
    async fn post_comment(
        &self,
        _session: &AuthenticatedSession,
        steam_id: SteamId,
        message: &str,
    ) -> Result<(), PostError> {
        self.posted
            .lock()
            .unwrap()
            .push((steam_id, message.to_string()));
        if self.failing.contains(&steam_id) {
            Err(PostError::Rejected("commenting disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn test_config(session_dir: &Path) -> Config {
    Config {
        credentials: Credentials {
            username: "alice".to_string(),
            password: Some("pw".to_string()),
            shared_secret: None,
            guard_code: None,
        },
        pacing: PacingConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
            interval_sec: Some(0.0),
        },
        login: LoginConfig {
            session_dir: session_dir.to_path_buf(),
            max_retries: 3,
            base_wait_sec: 120,
        },
        community: CommunityConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: 1,
        },
        default_message: "default".to_string(),
        csv_path: None,
    }
}

pub fn steam_id(suffix: u64) -> SteamId {
    format!("7656119800000000{}", suffix).parse().unwrap()
}
