//! Points ledger module (payer balances and FIFO redemption).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod spend;
pub mod transaction;

pub use spend::{check_adjustment, plan_spend};
pub use transaction::{PayerBalance, Transaction, payer_balance, payer_balances, sort_chronologically};
