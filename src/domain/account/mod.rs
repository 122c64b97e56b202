//! Account domain: login session and profile.

pub mod client;
pub mod wire;

pub use client::Accounts;
