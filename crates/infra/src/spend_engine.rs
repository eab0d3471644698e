//! Points operations pipeline (application-level orchestration).
//!
//! ```text
//! earn / spend
//!   ↓
//! 1. Lock the account (one critical section per account id)
//!   ↓
//! 2. Read the log or the payer balance from the ledger
//!   ↓
//! 3. Decide (pure functions from `rewards-ledger`)
//!   ↓
//! 4. Append the resulting transactions (atomic batch)
//! ```
//!
//! The engine only talks to storage through `TransactionLedger`, so backends
//! can be swapped without touching the business rules.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;

use rewards_core::{AccountId, DomainError};
use rewards_ledger::{PayerBalance, Transaction, check_adjustment, plan_spend};

use crate::ledger_store::{LedgerStoreError, TransactionLedger};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed request (non-positive spend amount, blank payer, points
    /// out of range, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Not enough points; nothing was recorded.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: i64, available: i64 },

    /// The ledger backend failed; nothing was recorded.
    #[error(transparent)]
    Storage(#[from] LedgerStoreError),
}

impl From<DomainError> for EngineError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg)
            | DomainError::InvalidId(msg)
            | DomainError::Overflow(msg) => EngineError::InvalidArgument(msg),
            DomainError::InsufficientBalance {
                requested,
                available,
            } => EngineError::InsufficientBalance {
                requested,
                available,
            },
        }
    }
}

/// Enforces the non-negative balance rule and redeems points FIFO.
///
/// Each operation runs read → decide → append while holding the account's
/// lock, so a concurrent reader never observes a partial settlement and two
/// spends cannot both consume the same points. A lock entry lives only while
/// some operation on its account holds or awaits it.
#[derive(Debug)]
pub struct SpendEngine<L> {
    ledger: L,
    locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl<L> SpendEngine<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Run `op` inside the account's critical section.
    fn with_account<T>(
        &self,
        account: &AccountId,
        op: impl FnOnce() -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let lock = self.account_lock(account)?;
        let result = match hold(&lock) {
            Ok(_guard) => op(),
            Err(e) => Err(e),
        };
        self.release(account, lock);
        result
    }

    fn account_lock(&self, account: &AccountId) -> Result<Arc<Mutex<()>>, EngineError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LedgerStoreError::Unavailable("account lock table poisoned".to_string()))?;
        Ok(locks.entry(account.clone()).or_default().clone())
    }

    // Handles are only cloned under the table lock, so a count of one here
    // means no other operation holds or awaits this account.
    fn release(&self, account: &AccountId, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };
        drop(lock);
        if locks.get(account).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(account);
        }
    }
}

fn hold(lock: &Mutex<()>) -> Result<MutexGuard<'_, ()>, EngineError> {
    lock.lock()
        .map_err(|_| LedgerStoreError::Unavailable("account lock poisoned".to_string()).into())
}

impl<L> SpendEngine<L>
where
    L: TransactionLedger,
{
    /// Record an earn (positive) or manual adjustment (zero/negative) transaction.
    ///
    /// Adjustments are rejected with `InsufficientBalance` if they would take
    /// the payer below zero.
    pub fn earn(&self, account: &AccountId, transaction: Transaction) -> Result<(), EngineError> {
        self.with_account(account, || {
            let history = self.ledger.list_transactions(account)?;

            if let Err(e) = check_adjustment(&history, &transaction) {
                tracing::warn!(
                    %account,
                    payer = %transaction.payer,
                    points = transaction.points,
                    error = %e,
                    "points adjustment rejected"
                );
                return Err(e.into());
            }

            tracing::debug!(
                %account,
                payer = %transaction.payer,
                points = transaction.points,
                "points recorded"
            );
            self.ledger.append(account, transaction)?;
            Ok(())
        })
    }

    /// Redeem `amount` points, oldest first, stamping settlements with the current time.
    pub fn spend(&self, account: &AccountId, amount: i64) -> Result<Vec<Transaction>, EngineError> {
        self.spend_at(account, amount, Utc::now())
    }

    /// Redeem `amount` points with settlements stamped `now`.
    ///
    /// On any failure nothing is appended.
    pub fn spend_at(
        &self,
        account: &AccountId,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, EngineError> {
        self.with_account(account, || {
            let history = self.ledger.list_transactions(account)?;
            let settlement = match plan_spend(&history, amount, now) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(%account, amount, error = %e, "spend rejected");
                    return Err(e.into());
                }
            };

            self.ledger.append_all(account, settlement.clone())?;
            tracing::info!(
                %account,
                amount,
                payers = settlement.len(),
                "points spent"
            );
            Ok(settlement)
        })
    }

    /// Net balance per payer, sorted by payer name.
    pub fn balances(&self, account: &AccountId) -> Result<Vec<PayerBalance>, EngineError> {
        Ok(self.ledger.list_balances(account)?)
    }

    /// Net balance of one payer; `None` if the payer never appeared.
    pub fn balance(&self, account: &AccountId, payer: &str) -> Result<Option<i64>, EngineError> {
        Ok(self.ledger.get_balance(account, payer)?)
    }

    /// Full transaction log, oldest first.
    pub fn transactions(&self, account: &AccountId) -> Result<Vec<Transaction>, EngineError> {
        Ok(self.ledger.list_transactions(account)?)
    }
}
