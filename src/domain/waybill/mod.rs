//! Waybill domain: dispatch orders moving through the network.

pub mod client;
pub mod wire;

pub use client::Waybills;
