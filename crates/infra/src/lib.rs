//! Infrastructure layer: ledger storage, the spend engine, and config.

pub mod config;
pub mod ledger_store;
pub mod spend_engine;

pub use config::{Config, ConfigError};
pub use ledger_store::{InMemoryTransactionLedger, LedgerStoreError, TransactionLedger};
pub use spend_engine::{EngineError, SpendEngine};
