//! Shared payment domain: pricing, gateway signing, transaction ledger,
//! checkout, and callback reconciliation.

pub mod context;
pub mod domain;
pub mod gateway;

mod ids;
