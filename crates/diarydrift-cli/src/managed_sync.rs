//! Managed sync token exchange for CLI profiles.

use diarydrift_core::db::SyncConfig;
use diarydrift_core::sync::{SyncTokenClient, SyncTokenError};

pub type ManagedSyncError = SyncTokenError;

#[derive(Clone)]
pub struct ManagedSyncAuthClient {
    inner: SyncTokenClient,
}

impl ManagedSyncAuthClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ManagedSyncError> {
        Ok(Self {
            inner: SyncTokenClient::new(endpoint)?,
        })
    }

    /// Trade an access token for replica settings. The profile's database URL
    /// is used when the endpoint does not name one.
    pub async fn exchange_sync_config(
        &self,
        access_token: &str,
        fallback_database_url: Option<&str>,
    ) -> Result<SyncConfig, ManagedSyncError> {
        let token = self.inner.exchange(access_token).await?;
        if token.is_expired() {
            return Err(ManagedSyncError::InvalidPayload(
                "endpoint returned an already expired token".to_string(),
            ));
        }
        token.to_sync_config(fallback_database_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_endpoints() {
        assert!(ManagedSyncAuthClient::new("  ").is_err());
        assert!(ManagedSyncAuthClient::new("api.example.com").is_err());
    }

    #[test]
    fn new_accepts_trailing_slash() {
        assert!(ManagedSyncAuthClient::new("https://api.example.com/v1/sync/token/").is_ok());
    }

    #[tokio::test]
    async fn exchange_rejects_blank_access_token() {
        let client = ManagedSyncAuthClient::new("http://127.0.0.1:9/token").unwrap();
        let error = client.exchange_sync_config("  ", None).await.unwrap_err();
        assert!(matches!(error, ManagedSyncError::InvalidConfiguration(_)));
    }
}
