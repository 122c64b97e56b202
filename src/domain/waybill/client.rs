//! Waybills sub-client — list and fetch dispatch orders.

use crate::client::FreightlineClient;
use crate::domain::waybill::wire::{Waybill, WaybillStatus, WaybillsResponse};
use crate::error::SdkError;
use crate::http::RetryPolicy;

/// Sub-client for waybill operations.
pub struct Waybills<'a> {
    pub(crate) client: &'a FreightlineClient,
}

impl<'a> Waybills<'a> {
    /// List waybills, optionally filtered by status, paginated.
    pub async fn list(
        &self,
        status: Option<WaybillStatus>,
        page: Option<u32>,
    ) -> Result<WaybillsResponse, SdkError> {
        let mut url = self.client.http().url("/api/waybills").await;
        let mut params = Vec::new();
        if let Some(s) = status {
            params.push(format!("status={}", s.as_str()));
        }
        if let Some(p) = page {
            params.push(format!("page={p}"));
        }
        if !params.is_empty() {
            url = format!("{}?{}", url, params.join("&"));
        }
        Ok(self
            .client
            .http()
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    /// Fetch a single waybill by id.
    pub async fn get(&self, id: &str) -> Result<Waybill, SdkError> {
        if id.is_empty() {
            return Err(SdkError::Validation("waybill id cannot be empty".to_string()));
        }
        let url = self
            .client
            .http()
            .url(&format!("/api/waybills/{}", urlencoding::encode(id)))
            .await;
        Ok(self
            .client
            .http()
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }
}
