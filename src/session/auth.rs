/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 15/10/26
 ******************************************************************************/
use crate::application::models::identity::SteamId;
use crate::config::Config;
use crate::error::{AuthError, ClientError};
use crate::session::guard::{CodeProvider, GuardCodeChain, InteractivePrompt, TotpCode};
use crate::session::interface::{AuthenticatedSession, WebSession};
use crate::session::retry::RetryPolicy;
use crate::storage::session_store::SessionStore;
use crate::transport::client::{ClientEvent, LogOnDetails, SteamClient};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Inputs for one login sequence. Never persisted.
#[derive(Clone, Default)]
pub struct LoginRequest {
    pub account_name: String,
    pub password: Option<String>,
    pub shared_secret: Option<String>,
    /// Used for at most one Steam Guard challenge across the whole sequence.
    pub one_time_code: Option<String>,
}

impl LoginRequest {
    pub fn from_config(config: &Config) -> Self {
        Self {
            account_name: config.credentials.username.clone(),
            password: config.credentials.password.clone(),
            shared_secret: config.credentials.shared_secret.clone(),
            one_time_code: config.credentials.guard_code.clone(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("LoginRequest")
            .field("account_name", &self.account_name)
            .field("password", &mask(&self.password))
            .field("shared_secret", &mask(&self.shared_secret))
            .field("one_time_code", &mask(&self.one_time_code))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    AwaitingCredentialAttempt,
    AwaitingChallenge,
    Authenticated,
    Failed,
}

/// One log-on call followed through to its outcome.
struct LoginAttempt<'a> {
    account_name: &'a str,
    store: &'a SessionStore,
    guard: &'a GuardCodeChain,
    state: LoginState,
    steam_id: Option<SteamId>,
}

impl<'a> LoginAttempt<'a> {
    fn new(account_name: &'a str, store: &'a SessionStore, guard: &'a GuardCodeChain) -> Self {
        Self {
            account_name,
            store,
            guard,
            state: LoginState::AwaitingCredentialAttempt,
            steam_id: None,
        }
    }

    fn fail(&mut self, err: AuthError) -> Result<AuthenticatedSession, AuthError> {
        self.state = LoginState::Failed;
        Err(err)
    }

    /// Pumps events until the attempt settles. After success the rest of the
    /// stream is handed to a background task so later login keys are still stored.
    async fn outcome(
        mut self,
        mut events: mpsc::Receiver<ClientEvent>,
    ) -> Result<AuthenticatedSession, AuthError> {
        while let Some(event) = events.recv().await {
            match event {
                ClientEvent::SteamGuard { challenge, reply } => {
                    self.state = LoginState::AwaitingChallenge;
                    warn!("{}.", challenge);
                    match self.guard.code_for(&challenge).await {
                        Some(code) => {
                            if reply.send(code).is_err() {
                                debug!("Client dropped the Steam Guard request");
                            }
                            self.state = LoginState::AwaitingCredentialAttempt;
                        }
                        None => {
                            return self.fail(AuthError::Other(
                                "no Steam Guard code available".to_string(),
                            ))
                        }
                    }
                }
                ClientEvent::LoginKey(key) => {
                    self.store.write(self.account_name, &key).await;
                }
                ClientEvent::LoggedOn { steam_id } => {
                    info!("Logged on to Steam.");
                    self.steam_id = steam_id;
                }
                ClientEvent::WebSession(web) => {
                    self.state = LoginState::Authenticated;
                    spawn_login_key_listener(self.account_name.to_string(), self.store.clone(), events);
                    return Ok(self.session(web));
                }
                ClientEvent::Error(e) => return self.fail(e.into()),
            }
        }
        debug!("Event stream ended in state {:?}", self.state);
        self.fail(
            ClientError::new("connection closed before a web session was established").into(),
        )
    }

    fn session(&self, web: WebSession) -> AuthenticatedSession {
        AuthenticatedSession {
            account_name: self.account_name.to_string(),
            steam_id: self.steam_id,
            web,
        }
    }
}

fn spawn_login_key_listener(
    account_name: String,
    store: SessionStore,
    mut events: mpsc::Receiver<ClientEvent>,
) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let ClientEvent::LoginKey(key) = event {
                store.write(&account_name, &key).await;
            }
        }
    });
}

/// Produces an authenticated session, preferring the stored login key and
/// falling back to password plus Steam Guard.
pub struct SteamLogin<C: SteamClient> {
    client: Arc<C>,
    store: SessionStore,
    retry: RetryPolicy,
    prompt: Arc<dyn CodeProvider>,
}

impl<C: SteamClient> SteamLogin<C> {
    pub fn new(client: Arc<C>, store: SessionStore) -> Self {
        Self {
            client,
            store,
            retry: RetryPolicy::default(),
            prompt: Arc::new(InteractivePrompt),
        }
    }

    pub fn from_config(client: Arc<C>, config: &Config) -> Self {
        Self::new(client, SessionStore::new(&config.login.session_dir)).with_retry(
            RetryPolicy::new(
                config.login.max_retries,
                Duration::from_secs(config.login.base_wait_sec),
            ),
        )
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the terminal prompt used when no other code source is available.
    pub fn with_prompt(mut self, prompt: Arc<dyn CodeProvider>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    async fn attempt(
        &self,
        details: LogOnDetails,
        guard: &GuardCodeChain,
    ) -> Result<AuthenticatedSession, AuthError> {
        let account_name = details.account_name.clone();
        let events = self.client.log_on(details).await;
        LoginAttempt::new(&account_name, &self.store, guard)
            .outcome(events)
            .await
    }

    /// A rate-limited stored-key path that runs out of retries fails the
    /// whole login: the limit applies to the account, not to the credential.
    #[instrument(skip(self, request), fields(account = %request.account_name))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthenticatedSession, AuthError> {
        let guard = GuardCodeChain::standard(
            request.one_time_code.clone(),
            request.shared_secret.clone(),
            self.prompt.clone(),
        );

        if let Some(login_key) = self.store.read(&request.account_name).await {
            let result = self
                .retry
                .run("loginKey", || {
                    self.attempt(
                        LogOnDetails {
                            account_name: request.account_name.clone(),
                            login_key: Some(login_key.clone()),
                            ..LogOnDetails::default()
                        },
                        &guard,
                    )
                })
                .await;
            match result {
                Ok(session) => return Ok(session),
                Err(e) if e.is_rate_limited() => return Err(e),
                Err(e) => warn!("Stored loginKey failed ({}), falling back to password + 2FA...", e),
            }
        }

        let password = request.password.clone().ok_or(AuthError::MissingPassword)?;
        let totp = request.shared_secret.as_ref().map(TotpCode::new);

        self.retry
            .run("password+2FA", || {
                self.attempt(
                    LogOnDetails {
                        account_name: request.account_name.clone(),
                        password: Some(password.clone()),
                        login_key: None,
                        two_factor_code: totp.as_ref().and_then(|t| t.current()),
                    },
                    &guard,
                )
            })
            .await
    }
}
