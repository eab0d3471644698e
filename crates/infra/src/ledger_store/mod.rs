//! Append-only transaction ledger boundary.
//!
//! This module defines an infrastructure-facing abstraction for storing and
//! reading account-scoped transaction logs without making any storage assumptions.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryTransactionLedger;
pub use r#trait::{LedgerStoreError, TransactionLedger};
