/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 14/10/26
 ******************************************************************************/
use std::{fmt, io};
use std::fmt::{Display, Formatter};
use reqwest::StatusCode;

/// Failure signalled by the remote Steam client during a log-on attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    pub message: String,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Steam reports throttling as `RateLimitExceeded`; some paths spell it out.
    pub fn is_rate_limited(&self) -> bool {
        let msg = self.message.to_lowercase();
        msg.contains("ratelimit") || msg.contains("rate limit")
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClientError {}

#[derive(Debug)]
pub enum AuthError {
    Client(ClientError),
    MissingPassword,
    Other(String),
}

impl AuthError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AuthError::Client(e) if e.is_rate_limited())
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Client(e) => write!(f, "login failed: {e}"),
            AuthError::MissingPassword => write!(f, "no usable login key and no password supplied"),
            AuthError::Other(msg) => write!(f, "other error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Client(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ClientError> for AuthError {
    fn from(e: ClientError) -> Self { AuthError::Client(e) }
}

#[derive(Debug)]
pub enum PostError {
    Network(reqwest::Error),
    Rejected(String),
    Unexpected(StatusCode),
}

impl Display for PostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PostError::Network(e)    => write!(f, "network error: {e}"),
            PostError::Rejected(msg) => write!(f, "comment rejected: {msg}"),
            PostError::Unexpected(s) => write!(f, "unexpected http status: {s}"),
        }
    }
}

impl std::error::Error for PostError {}

impl From<reqwest::Error> for PostError {
    fn from(e: reqwest::Error) -> Self { PostError::Network(e) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub input: String,
}

impl Display for ResolutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot resolve '{}': expected a SteamID64 or a /profiles/<id> URL",
            self.input
        )
    }
}

impl std::error::Error for ResolutionError {}

#[derive(Debug)]
pub enum AppError {
    Auth(AuthError),
    Network(reqwest::Error),
    Io(io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Resolution(ResolutionError),
    Config(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Auth(e)       => write!(f, "auth error: {e}"),
            AppError::Network(e)    => write!(f, "network error: {e}"),
            AppError::Io(e)         => write!(f, "io error: {e}"),
            AppError::Json(e)       => write!(f, "json error: {e}"),
            AppError::Csv(e)        => write!(f, "csv error: {e}"),
            AppError::Resolution(e) => write!(f, "resolution error: {e}"),
            AppError::Config(msg)   => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self { AppError::Auth(e) }
}
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self { AppError::Network(e) }
}
impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self { AppError::Io(e) }
}
impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self { AppError::Json(e) }
}
impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self { AppError::Csv(e) }
}
impl From<ResolutionError> for AppError {
    fn from(e: ResolutionError) -> Self { AppError::Resolution(e) }
}
