//! Managed replica credentials.
//!
//! A signed-in user can trade their auth access token for a short-lived
//! database token at a managed endpoint instead of configuring the remote
//! database URL and token by hand.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::db::SyncConfig;
use crate::util::{compact_text, is_http_url, normalize_text_option, unix_timestamp_now};

/// Tokens expiring within this many seconds are treated as expired.
const TOKEN_EXPIRY_SKEW_SECONDS: i64 = 30;

#[derive(Clone, PartialEq, Eq)]
pub struct SyncToken {
    pub token: String,
    pub expires_at: i64,
    pub database_url: Option<String>,
}

impl SyncToken {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + TOKEN_EXPIRY_SKEW_SECONDS
    }

    /// Replica settings for this token. The URL returned by the endpoint wins
    /// over `fallback_url`.
    pub fn to_sync_config(&self, fallback_url: Option<&str>) -> SyncTokenResult<SyncConfig> {
        let url = self
            .database_url
            .as_deref()
            .or(fallback_url)
            .ok_or_else(|| {
                SyncTokenError::InvalidConfiguration(
                    "no database URL from endpoint or profile".to_string(),
                )
            })?;
        Ok(SyncConfig::new(url, self.token.clone()))
    }
}

impl std::fmt::Debug for SyncToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SyncToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("database_url", &self.database_url)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SyncTokenError {
    #[error("Invalid sync configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Sync token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Sync token endpoint error: {0}")]
    Api(String),
    #[error("Invalid sync token payload: {0}")]
    InvalidPayload(String),
}

pub type SyncTokenResult<T> = Result<T, SyncTokenError>;

/// Client for the managed token exchange endpoint.
#[derive(Clone)]
pub struct SyncTokenClient {
    endpoint: String,
    client: reqwest::Client,
}

impl SyncTokenClient {
    pub fn new(endpoint: impl Into<String>) -> SyncTokenResult<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().build()?,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the access token as a bearer credential and parse the grant.
    pub async fn exchange(&self, access_token: &str) -> SyncTokenResult<SyncToken> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(SyncTokenError::InvalidConfiguration(
                "access token must not be empty".to_string(),
            ));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncTokenError::Api(describe_api_error(status, &body)));
        }

        let token: SyncToken = response.json::<SyncTokenResponse>().await?.try_into()?;
        tracing::debug!("Received sync token expiring at {}", token.expires_at);
        Ok(token)
    }
}

#[derive(Debug, Deserialize)]
struct SyncTokenResponse {
    #[serde(alias = "auth_token")]
    token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    database_url: Option<String>,
}

impl TryFrom<SyncTokenResponse> for SyncToken {
    type Error = SyncTokenError;

    fn try_from(value: SyncTokenResponse) -> SyncTokenResult<Self> {
        let token = normalize_text_option(value.token).ok_or_else(|| {
            SyncTokenError::InvalidPayload("response did not include a token".to_string())
        })?;

        let expires_at = value
            .expires_at
            .or_else(|| {
                value
                    .expires_in
                    .map(|seconds| unix_timestamp_now().saturating_add(seconds))
            })
            .ok_or_else(|| {
                SyncTokenError::InvalidPayload(
                    "response did not include expires_at or expires_in".to_string(),
                )
            })?;

        Ok(Self {
            token,
            expires_at,
            database_url: normalize_text_option(value.database_url),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn describe_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let body = compact_text(body);
    if body.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{body} ({})", status.as_u16())
    }
}

fn normalize_endpoint(raw: String) -> SyncTokenResult<String> {
    let endpoint = normalize_text_option(Some(raw)).ok_or_else(|| {
        SyncTokenError::InvalidConfiguration("endpoint must not be empty".to_string())
    })?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(SyncTokenError::InvalidConfiguration(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}
