//! Accounts sub-client — login, profile.

use crate::client::FreightlineClient;
use crate::domain::account::wire::{Account, LoginRequest, Session};
use crate::error::SdkError;
use crate::http::RetryPolicy;

/// Sub-client for account operations.
pub struct Accounts<'a> {
    pub(crate) client: &'a FreightlineClient,
}

impl<'a> Accounts<'a> {
    /// Log in with phone credentials.
    ///
    /// On success the issued token replaces the shared access token, so every
    /// subsequent request authenticates as this account.
    pub async fn login(&self, phone: &str, password: &str) -> Result<Session, SdkError> {
        if phone.is_empty() {
            return Err(SdkError::Validation("phone cannot be empty".to_string()));
        }

        let request = LoginRequest {
            phone: phone.to_string(),
            password: password.to_string(),
        };
        let url = self.client.http().url("/api/session").await;
        let session: Session = self
            .client
            .http()
            .post(&url, &request, RetryPolicy::None)
            .await?;

        self.client.http().token().set(session.token.clone()).await;
        Ok(session)
    }

    /// Fetch the profile of the authenticated account.
    pub async fn me(&self) -> Result<Account, SdkError> {
        let url = self.client.http().url("/api/account/me").await;
        Ok(self
            .client
            .http()
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }
}
