/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 15/10/26
 ******************************************************************************/
use crate::constants::{TOTP_ALPHABET, TOTP_PERIOD_SEC};
use crate::transport::client::GuardChallenge;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Something able to answer a Steam Guard challenge. `None` means "not me, ask the next one".
#[async_trait]
pub trait CodeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn provide(&self, challenge: &GuardChallenge) -> Option<String>;
}

/// Steam's mobile authenticator code for `unix_time`.
pub fn generate_auth_code(shared_secret: &str, unix_time: i64) -> anyhow::Result<String> {
    let key = general_purpose::STANDARD
        .decode(shared_secret.trim())
        .map_err(|e| anyhow::anyhow!("Shared secret is not valid base64: {e}"))?;

    let counter = (unix_time / TOTP_PERIOD_SEC) as u64;
    let mut mac = Hmac::<Sha1>::new_from_slice(&key)
        .map_err(|e| anyhow::anyhow!("Failed to create HMAC: {e}"))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[19] & 0x0f) as usize;
    let mut full = u32::from_be_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]) & 0x7fff_ffff;

    let mut code = String::with_capacity(5);
    for _ in 0..5 {
        let idx = (full % TOTP_ALPHABET.len() as u32) as usize;
        code.push(TOTP_ALPHABET[idx] as char);
        full /= TOTP_ALPHABET.len() as u32;
    }
    Ok(code)
}

/// A code handed in from outside the process. It is given out once, then gone.
pub struct SuppliedCode {
    code: Mutex<Option<String>>,
}

impl SuppliedCode {
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into().trim().to_string();
        Self {
            code: Mutex::new(Some(code).filter(|c| !c.is_empty())),
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.code.lock().map(|c| c.is_none()).unwrap_or(true)
    }
}

#[async_trait]
impl CodeProvider for SuppliedCode {
    fn name(&self) -> &'static str {
        "supplied"
    }

    async fn provide(&self, _challenge: &GuardChallenge) -> Option<String> {
        match self.code.lock() {
            Ok(mut code) => code.take(),
            Err(_) => None,
        }
    }
}

/// Generates codes from the account's shared secret.
pub struct TotpCode {
    shared_secret: String,
}

impl TotpCode {
    pub fn new(shared_secret: impl Into<String>) -> Self {
        Self {
            shared_secret: shared_secret.into(),
        }
    }

    pub fn current(&self) -> Option<String> {
        match generate_auth_code(&self.shared_secret, Utc::now().timestamp()) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!("Cannot generate Steam Guard code: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl CodeProvider for TotpCode {
    fn name(&self) -> &'static str {
        "totp"
    }

    async fn provide(&self, _challenge: &GuardChallenge) -> Option<String> {
        self.current()
    }
}

/// Last resort: asks whoever sits at the terminal.
#[derive(Default)]
pub struct InteractivePrompt;

#[async_trait]
impl CodeProvider for InteractivePrompt {
    fn name(&self) -> &'static str {
        "prompt"
    }

    async fn provide(&self, _challenge: &GuardChallenge) -> Option<String> {
        let answer = tokio::task::spawn_blocking(|| {
            dialoguer::Input::<String>::new()
                .with_prompt("Enter Steam Guard code")
                .interact_text()
        })
        .await;

        match answer {
            Ok(Ok(code)) => Some(code.trim().to_string()),
            Ok(Err(e)) => {
                warn!("Steam Guard prompt failed: {}", e);
                None
            }
            Err(e) => {
                warn!("Steam Guard prompt task failed: {}", e);
                None
            }
        }
    }
}

/// Providers in priority order; the first one with an answer wins.
pub struct GuardCodeChain {
    providers: Vec<Arc<dyn CodeProvider>>,
}

impl GuardCodeChain {
    pub fn new(providers: Vec<Arc<dyn CodeProvider>>) -> Self {
        Self { providers }
    }

    /// Supplied code, then shared secret, then `fallback` (normally [`InteractivePrompt`]).
    pub fn standard(
        one_time_code: Option<String>,
        shared_secret: Option<String>,
        fallback: Arc<dyn CodeProvider>,
    ) -> Self {
        let mut providers: Vec<Arc<dyn CodeProvider>> = Vec::new();
        if let Some(code) = one_time_code {
            providers.push(Arc::new(SuppliedCode::new(code)));
        }
        if let Some(secret) = shared_secret {
            providers.push(Arc::new(TotpCode::new(secret)));
        }
        providers.push(fallback);
        Self::new(providers)
    }

    pub async fn code_for(&self, challenge: &GuardChallenge) -> Option<String> {
        for provider in &self.providers {
            if let Some(code) = provider.provide(challenge).await {
                debug!("Steam Guard code obtained from {} provider", provider.name());
                return Some(code);
            }
        }
        None
    }
}
