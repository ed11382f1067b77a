use anyhow::anyhow;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{config::Config, models::dispatch::DispatchPayload};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Error)]
pub enum DispatchError {
    /// GitHub answered, but not with a 2xx.
    #[error("GitHub returned {status}")]
    Downstream { status: StatusCode, body: String },

    /// No response was obtained (connect failure, timeout, TLS).
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct DispatchClient {
    http_client: Client,
    dispatch_url: String,
    access_token: String,
}

impl DispatchClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.relay_user_agent)
                .map_err(|_| anyhow!("RELAY_USER_AGENT is not a valid header value"))?,
        );

        let http_client = Client::builder()
            .timeout(config.dispatch_timeout())
            .default_headers(default_headers)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        let dispatch_url = config.dispatch_url();
        info!(url = %dispatch_url, "GitHub dispatch client initialized");

        Ok(Self {
            http_client,
            dispatch_url,
            access_token: config.gh_pat.clone(),
        })
    }

    /// Sends one `repository_dispatch`. There is no retry; the CMS owns
    /// redelivery.
    pub async fn dispatch(&self, payload: &DispatchPayload) -> Result<(), DispatchError> {
        debug!(
            event_type = %payload.event_type,
            entity = %payload.client_payload.entity,
            "Sending repository dispatch"
        );

        let response = self
            .http_client
            .post(&self.dispatch_url)
            .bearer_auth(&self.access_token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "GitHub dispatch successful");
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));

        error!(status = status.as_u16(), body = %body, "GitHub dispatch failed");

        Err(DispatchError::Downstream { status, body })
    }
}
