//! Domain modules (vertical slices): sub-clients and wire types.

pub mod account;
pub mod waybill;
