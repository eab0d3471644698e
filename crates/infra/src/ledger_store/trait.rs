use std::sync::Arc;

use thiserror::Error;

use rewards_core::{AccountId, DomainError};
use rewards_ledger::{PayerBalance, Transaction, payer_balance, payer_balances};

/// Ledger storage error.
///
/// These are **infrastructure errors** as opposed to domain errors (validation,
/// balance checks). They are propagated unchanged to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerStoreError {
    /// The backend could not complete a read or append.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The stored log yields a balance the ledger cannot represent.
    #[error("ledger inconsistent: {0}")]
    Inconsistent(String),
}

impl LedgerStoreError {
    pub(crate) fn inconsistent(err: DomainError) -> Self {
        Self::Inconsistent(err.to_string())
    }
}

/// Append-only, account-scoped transaction log.
///
/// ## Append Semantics
///
/// `append_all()`:
/// - Performs no validation (business rules live in `SpendEngine`)
/// - Imposes no ordering at insertion time
/// - Persists the batch atomically (all or nothing)
///
/// ## Read Semantics
///
/// `list_transactions()`:
/// - Returns every transaction of the account, oldest first
/// - Transactions sharing a timestamp keep their insertion order
/// - Returns an empty vector for an unknown account
///
/// Balances are always derived from the log. Implementations that cache them
/// must invalidate on every append.
pub trait TransactionLedger: Send + Sync {
    /// Append a batch of transactions to an account's log (all or nothing).
    fn append_all(
        &self,
        account: &AccountId,
        transactions: Vec<Transaction>,
    ) -> Result<(), LedgerStoreError>;

    /// Load the full log for an account, ordered by timestamp.
    fn list_transactions(&self, account: &AccountId) -> Result<Vec<Transaction>, LedgerStoreError>;

    /// Append a single transaction.
    fn append(&self, account: &AccountId, transaction: Transaction) -> Result<(), LedgerStoreError> {
        self.append_all(account, vec![transaction])
    }

    /// Net balance per payer, sorted by payer name (zero balances included).
    fn list_balances(&self, account: &AccountId) -> Result<Vec<PayerBalance>, LedgerStoreError> {
        payer_balances(&self.list_transactions(account)?).map_err(LedgerStoreError::inconsistent)
    }

    /// Net balance of one payer; `None` if the payer has no transactions.
    fn get_balance(&self, account: &AccountId, payer: &str) -> Result<Option<i64>, LedgerStoreError> {
        payer_balance(&self.list_transactions(account)?, payer).map_err(LedgerStoreError::inconsistent)
    }
}

impl<S> TransactionLedger for Arc<S>
where
    S: TransactionLedger + ?Sized,
{
    fn append_all(
        &self,
        account: &AccountId,
        transactions: Vec<Transaction>,
    ) -> Result<(), LedgerStoreError> {
        (**self).append_all(account, transactions)
    }

    fn list_transactions(&self, account: &AccountId) -> Result<Vec<Transaction>, LedgerStoreError> {
        (**self).list_transactions(account)
    }

    fn append(&self, account: &AccountId, transaction: Transaction) -> Result<(), LedgerStoreError> {
        (**self).append(account, transaction)
    }

    fn list_balances(&self, account: &AccountId) -> Result<Vec<PayerBalance>, LedgerStoreError> {
        (**self).list_balances(account)
    }

    fn get_balance(&self, account: &AccountId, payer: &str) -> Result<Option<i64>, LedgerStoreError> {
        (**self).get_balance(account, payer)
    }
}
