use std::sync::Arc;

use rewards_infra::{InMemoryTransactionLedger, SpendEngine};

/// Engine over the process-lifetime in-memory ledger.
pub type InMemoryEngine = SpendEngine<Arc<InMemoryTransactionLedger>>;

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppServices {
    pub engine: InMemoryEngine,
}

pub fn build_services() -> AppServices {
    let ledger = Arc::new(InMemoryTransactionLedger::new());
    tracing::info!("using in-memory transaction ledger (state is lost on restart)");

    AppServices {
        engine: SpendEngine::new(ledger),
    }
}
