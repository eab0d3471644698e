use std::collections::HashMap;
use std::sync::RwLock;

use rewards_core::AccountId;
use rewards_ledger::{Transaction, payer_balance, sort_chronologically};

use super::r#trait::{LedgerStoreError, TransactionLedger};

/// In-memory append-only transaction ledger.
///
/// State lives for the process lifetime only. Logs are kept in insertion
/// order and sorted on read.
#[derive(Debug, Default)]
pub struct InMemoryTransactionLedger {
    accounts: RwLock<HashMap<AccountId, Vec<Transaction>>>,
}

impl InMemoryTransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionLedger for InMemoryTransactionLedger {
    fn append_all(
        &self,
        account: &AccountId,
        transactions: Vec<Transaction>,
    ) -> Result<(), LedgerStoreError> {
        if transactions.is_empty() {
            return Ok(());
        }

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| LedgerStoreError::Unavailable("lock poisoned".to_string()))?;

        accounts
            .entry(account.clone())
            .or_default()
            .extend(transactions);
        Ok(())
    }

    fn list_transactions(&self, account: &AccountId) -> Result<Vec<Transaction>, LedgerStoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| LedgerStoreError::Unavailable("lock poisoned".to_string()))?;

        let mut log = accounts.get(account).cloned().unwrap_or_default();
        sort_chronologically(&mut log);
        Ok(log)
    }

    // No need to clone and sort the whole log for a single sum.
    fn get_balance(&self, account: &AccountId, payer: &str) -> Result<Option<i64>, LedgerStoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| LedgerStoreError::Unavailable("lock poisoned".to_string()))?;

        match accounts.get(account) {
            Some(log) => payer_balance(log, payer).map_err(LedgerStoreError::inconsistent),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rewards_ledger::PayerBalance;

    fn account(id: &str) -> AccountId {
        AccountId::new(id).unwrap()
    }

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 10, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn unknown_account_reads_as_empty() {
        let ledger = InMemoryTransactionLedger::new();
        let acct = account("nobody");

        assert!(ledger.list_transactions(&acct).unwrap().is_empty());
        assert!(ledger.list_balances(&acct).unwrap().is_empty());
        assert_eq!(ledger.get_balance(&acct, "DANNON").unwrap(), None);
    }

    #[test]
    fn transactions_are_returned_oldest_first() {
        let ledger = InMemoryTransactionLedger::new();
        let acct = account("alice");

        ledger.append(&acct, Transaction::new("DANNON", 1000, ts(31, 14))).unwrap();
        ledger.append(&acct, Transaction::new("UNILEVER", 200, ts(30, 11))).unwrap();
        ledger.append(&acct, Transaction::new("DANNON", 300, ts(30, 10))).unwrap();

        let points: Vec<i64> = ledger
            .list_transactions(&acct)
            .unwrap()
            .iter()
            .map(|t| t.points)
            .collect();
        assert_eq!(points, vec![300, 200, 1000]);
    }

    #[test]
    fn balances_are_scoped_per_account() {
        let ledger = InMemoryTransactionLedger::new();
        let alice = account("alice");
        let bob = account("bob");

        ledger
            .append_all(
                &alice,
                vec![
                    Transaction::new("UNILEVER", 200, ts(30, 11)),
                    Transaction::new("DANNON", 300, ts(30, 10)),
                    Transaction::new("UNILEVER", -200, ts(30, 12)),
                ],
            )
            .unwrap();
        ledger.append(&bob, Transaction::new("DANNON", 5, ts(30, 9))).unwrap();

        assert_eq!(
            ledger.list_balances(&alice).unwrap(),
            vec![
                PayerBalance { payer: "DANNON".into(), points: 300 },
                PayerBalance { payer: "UNILEVER".into(), points: 0 },
            ]
        );
        assert_eq!(ledger.get_balance(&alice, "UNILEVER").unwrap(), Some(0));
        assert_eq!(ledger.get_balance(&bob, "DANNON").unwrap(), Some(5));
        assert_eq!(ledger.get_balance(&bob, "UNILEVER").unwrap(), None);
    }

    #[test]
    fn unrepresentable_balance_is_reported_as_inconsistent() {
        let ledger = InMemoryTransactionLedger::new();
        let acct = account("alice");
        ledger
            .append_all(
                &acct,
                vec![
                    Transaction::new("DANNON", i64::MAX, ts(30, 10)),
                    Transaction::new("DANNON", 1, ts(30, 11)),
                ],
            )
            .unwrap();

        assert!(matches!(
            ledger.list_balances(&acct).unwrap_err(),
            LedgerStoreError::Inconsistent(_)
        ));
        assert!(matches!(
            ledger.get_balance(&acct, "DANNON").unwrap_err(),
            LedgerStoreError::Inconsistent(_)
        ));
    }

    #[test]
    fn empty_batch_does_not_create_account() {
        let ledger = InMemoryTransactionLedger::new();
        ledger.append_all(&account("alice"), vec![]).unwrap();
        assert!(ledger.accounts.read().unwrap().is_empty());
    }
}
