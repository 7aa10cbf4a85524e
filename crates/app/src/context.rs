//! App Context

use std::sync::Arc;

use crate::{
    domain::{
        checkout::{CheckoutService, EsewaCheckout},
        ledger::{InMemoryLedger, LedgerService},
        reconciliation::{EsewaReconciliation, ReconciliationService},
    },
    gateway::EsewaConfig,
};

/// Shared application services, one per concern, injected into handlers.
#[derive(Clone)]
pub struct AppContext {
    pub ledger: Arc<dyn LedgerService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub reconciliation: Arc<dyn ReconciliationService>,
}

impl AppContext {
    /// Build the context around a fresh in-memory ledger.
    #[must_use]
    pub fn new(config: EsewaConfig) -> Self {
        let ledger: Arc<dyn LedgerService> = Arc::new(InMemoryLedger::new());
        let reconciliation = Arc::new(EsewaReconciliation::new(&config, Arc::clone(&ledger)));
        let checkout = Arc::new(EsewaCheckout::new(config, Arc::clone(&ledger)));

        Self {
            ledger,
            checkout,
            reconciliation,
        }
    }
}
