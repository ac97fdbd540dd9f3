use std::sync::Arc;

use crate::service::Ledger;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Ledger service, independent of the storage engine behind it
    pub ledger: Arc<dyn Ledger>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }
}
