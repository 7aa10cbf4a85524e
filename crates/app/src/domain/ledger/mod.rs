//! Transaction ledger

pub mod errors;
pub mod models;
pub mod service;

pub use errors::LedgerError;
pub use service::*;
