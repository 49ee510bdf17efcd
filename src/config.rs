use crate::constants::{
    DEFAULT_COMMUNITY_URL, DEFAULT_HTTP_TIMEOUT_SEC, DEFAULT_LOGIN_BASE_WAIT_SEC,
    DEFAULT_LOGIN_MAX_RETRIES, DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS, DEFAULT_SESSION_DIR,
};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, error};

#[derive(Debug, Deserialize, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
    pub shared_secret: Option<String>,
    pub guard_code: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub pacing: PacingConfig,
    pub login: LoginConfig,
    pub community: CommunityConfig,
    pub default_message: String,
    pub csv_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Fixed interval in seconds; when set it wins over min/max.
    pub interval_sec: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginConfig {
    pub session_dir: PathBuf,
    pub max_retries: u32,
    pub base_wait_sec: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommunityConfig {
    pub base_url: String,
    pub timeout: u64,
}

fn redact(value: &Option<String>) -> String {
    value
        .as_ref()
        .map_or("null".to_string(), |_| "\"[REDACTED]\"".to_string())
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"username\":\"{}\",\"password\":{},\"shared_secret\":{},\"guard_code\":{}}}",
               self.username,
               redact(&self.password),
               redact(&self.shared_secret),
               redact(&self.guard_code))
    }
}

impl fmt::Display for PacingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"min_delay_ms\":{},\"max_delay_ms\":{},\"interval_sec\":{}}}",
            self.min_delay_ms,
            self.max_delay_ms,
            self.interval_sec.map_or("null".to_string(), |s| s.to_string())
        )
    }
}

impl fmt::Display for LoginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"session_dir\":\"{}\",\"max_retries\":{},\"base_wait_sec\":{}}}",
            self.session_dir.display(),
            self.max_retries,
            self.base_wait_sec
        )
    }
}

impl fmt::Display for CommunityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"timeout\":{}}}",
            self.base_url, self.timeout
        )
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"credentials\":{},\"pacing\":{},\"login\":{},\"community\":{},\"default_message\":{},\"csv_path\":{}}}",
            self.credentials,
            self.pacing,
            self.login,
            self.community,
            if self.default_message.is_empty() { "\"empty\"" } else { "\"set\"" },
            self.csv_path
                .as_ref()
                .map_or("null".to_string(), |p| format!("\"{}\"", p))
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

/// Like [`get_env_or_default`] but treats unset and blank variables as absent.
pub fn get_env_opt<T: FromStr>(env_var: &str) -> Option<T>
where
    <T as FromStr>::Err: Debug,
{
    let val = env::var(env_var).ok()?;
    let val = val.trim();
    if val.is_empty() {
        return None;
    }
    match val.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            error!("Failed to parse {}: {}, ignoring", env_var, val);
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            credentials: Credentials {
                username: get_env_or_default("STEAM_USERNAME", String::new()),
                password: get_env_opt("STEAM_PASSWORD"),
                shared_secret: get_env_opt("STEAM_SHARED_SECRET"),
                guard_code: get_env_opt("STEAM_GUARD_CODE"),
            },
            pacing: PacingConfig {
                min_delay_ms: get_env_or_default("MIN_DELAY_MS", DEFAULT_MIN_DELAY_MS),
                max_delay_ms: get_env_or_default("MAX_DELAY_MS", DEFAULT_MAX_DELAY_MS),
                interval_sec: get_env_opt("INTERVAL_SEC"),
            },
            login: LoginConfig {
                session_dir: PathBuf::from(get_env_or_default(
                    "SESSION_DIR",
                    String::from(DEFAULT_SESSION_DIR),
                )),
                max_retries: get_env_or_default("LOGIN_MAX_RETRIES", DEFAULT_LOGIN_MAX_RETRIES),
                base_wait_sec: get_env_or_default("LOGIN_BASE_WAIT_SEC", DEFAULT_LOGIN_BASE_WAIT_SEC),
            },
            community: CommunityConfig {
                base_url: get_env_or_default(
                    "COMMUNITY_BASE_URL",
                    String::from(DEFAULT_COMMUNITY_URL),
                ),
                timeout: get_env_or_default("HTTP_TIMEOUT_SEC", DEFAULT_HTTP_TIMEOUT_SEC),
            },
            default_message: get_env_or_default("DEFAULT_MESSAGE", String::new()),
            csv_path: get_env_opt("CSV_PATH"),
        }
    }

    /// Loads a `.env` file from the working directory (if any) before reading the environment.
    pub fn from_dotenv() -> Self {
        match dotenv::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env loaded: {}", e),
        }
        Self::new()
    }
}
