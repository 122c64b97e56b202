//! # Freightline SDK
//!
//! A Rust SDK for the Freightline dispatch API. The crate configures one
//! shared HTTP client — connection pooling, offline response caching, header
//! injection, structured logging, timeouts and retries — and exposes typed
//! sub-clients for issuing requests against it.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Config, errors, connectivity state, access-token store
//! 2. **HTTP** — `FreightlineHttp` with per-request retry policies and the
//!    disk cache stage
//! 3. **Domain** — Typed sub-clients per vertical slice (accounts, waybills)
//! 4. **High-Level Client** — `FreightlineClient` with the builder, the
//!    process-wide shared instance, and retrying subscriptions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use freightline_sdk::prelude::*;
//!
//! let client = FreightlineClient::builder()
//!     .base_url("https://api.freightline.app")
//!     .build()?;
//!
//! let waybills = client.waybills().list(None, None).await?;
//! let me = client.accounts().me().await?;
//! ```
//!
//! Applications that want a single process-wide instance use
//! [`client::FreightlineClient::shared`] instead of the builder.

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Client configuration: base URL, timeouts, cache location and caps.
pub mod config;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

/// Process-wide online/offline state, toggled by the host application.
pub mod connectivity;

/// Shared access-token store.
pub mod auth;

// ── Layer 2: HTTP ────────────────────────────────────────────────────────────

/// HTTP client with retry policies and the disk cache stage.
pub mod http;

// ── Layer 3: Domain ──────────────────────────────────────────────────────────

/// Domain modules (vertical slices): sub-clients and wire types.
pub mod domain;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `FreightlineClient` — the primary entry point.
pub mod client;

/// Background subscriptions with retry-before-error delivery.
pub mod task;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    pub use crate::client::{FreightlineClient, FreightlineClientBuilder};
    pub use crate::config::ClientConfig;
    pub use crate::connectivity::Connectivity;
    pub use crate::error::{CacheError, HttpError, SdkError};
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
    pub use crate::network::DEFAULT_API_URL;
    pub use crate::task::Observer;

    // Domain types — accounts
    pub use crate::domain::account::wire::{Account, LoginRequest, Session};
    pub use crate::domain::account::Accounts;

    // Domain types — waybills
    pub use crate::domain::waybill::wire::{Waybill, WaybillStatus, WaybillsResponse};
    pub use crate::domain::waybill::Waybills;
}
