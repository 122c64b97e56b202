//! HTTP layer: transport client, retry policies, and the disk cache stage.

pub mod cache;
pub mod client;
pub mod retry;

pub use cache::{CachePolicy, DiskCache};
pub use client::{FreightlineHttp, ACCESS_TOKEN_HEADER};
pub use retry::{RetryConfig, RetryPolicy};
