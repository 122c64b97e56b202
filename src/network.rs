//! Network URL constants for the Freightline SDK.

/// Default REST API base URL for Freightline.
pub const DEFAULT_API_URL: &str = "https://api.freightline.app";
