//! Wire types for the waybill endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a waybill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaybillStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl WaybillStatus {
    /// Query-parameter form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A single dispatch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waybill {
    pub id: String,
    pub status: WaybillStatus,
    pub origin: String,
    pub destination: String,
    /// Agreed freight fee, serialized as a decimal string.
    pub fee: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /api/waybills`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaybillsResponse {
    pub waybills: Vec<Waybill>,
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serde_matches_query_form() {
        for status in [
            WaybillStatus::Pending,
            WaybillStatus::InTransit,
            WaybillStatus::Delivered,
            WaybillStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn waybill_deserializes_decimal_fee() {
        let waybill: Waybill = serde_json::from_value(serde_json::json!({
            "id": "wb-1",
            "status": "in_transit",
            "origin": "Chengdu",
            "destination": "Xi'an",
            "fee": "1280.50",
            "created_at": "2026-08-01T08:30:00Z",
        }))
        .unwrap();
        assert_eq!(waybill.status, WaybillStatus::InTransit);
        assert_eq!(waybill.fee.to_string(), "1280.50");
    }
}
