/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 14/10/26
******************************************************************************/

pub(crate) const DEFAULT_SESSION_DIR: &str = ".session";
pub(crate) const DEFAULT_SESSION_KEY: &str = "default";

pub(crate) const DEFAULT_MIN_DELAY_MS: u64 = 30_000;
pub(crate) const DEFAULT_MAX_DELAY_MS: u64 = 90_000;

pub(crate) const DEFAULT_LOGIN_MAX_RETRIES: u32 = 3;
pub(crate) const DEFAULT_LOGIN_BASE_WAIT_SEC: u64 = 120;
/// Upper bound (exclusive) of the random seconds added to each backoff wait.
pub(crate) const LOGIN_JITTER_SEC: u64 = 15;

pub(crate) const DEFAULT_COMMUNITY_URL: &str = "https://steamcommunity.com";
pub(crate) const DEFAULT_HTTP_TIMEOUT_SEC: u64 = 30;

pub(crate) const TOTP_PERIOD_SEC: i64 = 30;
pub(crate) const TOTP_ALPHABET: &[u8] = b"23456789BCDFGHJKMNPQRTVWXY";
