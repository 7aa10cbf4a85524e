//! Domain modules.

pub mod checkout;
pub mod ledger;
pub mod pricing;
pub mod reconciliation;
pub mod signature;
