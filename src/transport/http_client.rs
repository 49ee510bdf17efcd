use crate::application::models::identity::SteamId;
use crate::error::PostError;
use crate::session::interface::AuthenticatedSession;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Posts one comment on a profile using an authenticated web session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentPoster: Send + Sync {
    async fn post_comment(
        &self,
        session: &AuthenticatedSession,
        steam_id: SteamId,
        message: &str,
    ) -> Result<(), PostError>;
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Steam Community web client used for profile comments.
#[derive(Debug)]
pub struct CommunityWebClient {
    client: Client,
    base_url: String,
}

impl CommunityWebClient {
    /// Creates a new client against `base_url` (normally `https://steamcommunity.com`).
    ///
    /// # Arguments
    ///
    /// * `base_url` - Community host, without trailing path.
    /// * `timeout_secs` - Per-request timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
        );
        headers.insert(
            "X-Requested-With",
            header::HeaderValue::from_static("XMLHttpRequest"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn comment_url(&self, steam_id: SteamId) -> String {
        format!("{}/comment/Profile/post/{}/-1/", self.base_url, steam_id)
    }

    async fn handle_response(response: Response) -> Result<(), PostError> {
        let status = response.status();
        let body_text = response.text().await?;

        debug!("Response Status: {}", status);
        debug!("Response Body: {}", body_text);

        if !status.is_success() {
            error!("Comment request failed. Status: {}, Body: {}", status, body_text);
            return Err(PostError::Unexpected(status));
        }

        match serde_json::from_str::<CommentResponse>(&body_text) {
            Ok(CommentResponse { success: true, .. }) => Ok(()),
            Ok(CommentResponse { error, .. }) => Err(PostError::Rejected(
                error.unwrap_or_else(|| "unknown error".to_string()),
            )),
            Err(e) => Err(PostError::Rejected(format!("unreadable response: {e}"))),
        }
    }
}

#[async_trait]
impl CommentPoster for CommunityWebClient {
    #[instrument(skip(self, session, message))]
    async fn post_comment(
        &self,
        session: &AuthenticatedSession,
        steam_id: SteamId,
        message: &str,
    ) -> Result<(), PostError> {
        let url = self.comment_url(steam_id);
        debug!("Sending POST request to {}", url);

        let form = [
            ("comment", message),
            ("count", "6"),
            ("sessionid", session.web.session_id.as_str()),
            ("feature2", "-1"),
        ];

        let response = self
            .client
            .post(&url)
            .header(header::COOKIE, session.web.cookie_header())
            .form(&form)
            .send()
            .await?;

        Self::handle_response(response).await
    }
}

impl fmt::Display for CommunityWebClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"base_url\":\"{}\"}}", self.base_url)
    }
}
