use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rewards_core::{DomainError, DomainResult};

/// A signed movement of points attributed to one payer (immutable).
///
/// Positive points were earned from the payer; negative points were redeemed
/// against it. Settling a spend produces new transactions, never edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub payer: String,
    pub points: i64,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(payer: impl Into<String>, points: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            payer: payer.into(),
            points,
            timestamp,
        }
    }

    /// Whether this transaction adds points (as opposed to an adjustment or redemption).
    pub fn is_earn(&self) -> bool {
        self.points > 0
    }
}

/// Derived net balance of one payer within an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerBalance {
    pub payer: String,
    pub points: i64,
}

/// Order transactions by timestamp, oldest first.
///
/// The sort is stable, so transactions sharing a timestamp keep their
/// insertion order.
pub fn sort_chronologically(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|t| t.timestamp);
}

/// Sum points per payer, sorted ascending by payer name.
///
/// Every payer that appears is reported, including those netting to zero.
/// Sums are exact; a payer whose net balance does not fit in `i64` is an
/// `Overflow` error.
pub fn payer_balances<'a, I>(transactions: I) -> DomainResult<Vec<PayerBalance>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: BTreeMap<&'a str, i128> = BTreeMap::new();
    for t in transactions {
        *totals.entry(t.payer.as_str()).or_insert(0) += i128::from(t.points);
    }

    totals
        .into_iter()
        .map(|(payer, total)| {
            Ok(PayerBalance {
                payer: payer.to_string(),
                points: narrow(total, payer)?,
            })
        })
        .collect()
}

/// Net balance of a single payer, or `None` if the payer never appears.
pub fn payer_balance<'a, I>(transactions: I, payer: &str) -> DomainResult<Option<i64>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| t.payer == payer)
        .fold(None, |acc: Option<i128>, t| {
            Some(acc.unwrap_or(0) + i128::from(t.points))
        })
        .map(|total| narrow(total, payer))
        .transpose()
}

/// Exact sum of every transaction's points.
pub(crate) fn points_total<'a, I>(transactions: I) -> i128
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().map(|t| i128::from(t.points)).sum()
}

/// Convert an exact sum back to the ledger's point type.
pub(crate) fn narrow(total: i128, what: &str) -> DomainResult<i64> {
    i64::try_from(total)
        .map_err(|_| DomainError::overflow(format!("{what}: {total} points is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 10, 31, hour, 0, 0).unwrap()
    }

    #[test]
    fn balances_are_sorted_by_payer_and_keep_zero_totals() {
        let txs = vec![
            Transaction::new("UNILEVER", 200, at(11)),
            Transaction::new("DANNON", 300, at(10)),
            Transaction::new("UNILEVER", -200, at(12)),
        ];

        let balances = payer_balances(&txs).unwrap();
        assert_eq!(
            balances,
            vec![
                PayerBalance { payer: "DANNON".into(), points: 300 },
                PayerBalance { payer: "UNILEVER".into(), points: 0 },
            ]
        );
    }

    #[test]
    fn unknown_payer_is_distinct_from_zero_balance() {
        let txs = vec![
            Transaction::new("DANNON", 100, at(10)),
            Transaction::new("DANNON", -100, at(11)),
        ];

        assert_eq!(payer_balance(&txs, "DANNON").unwrap(), Some(0));
        assert_eq!(payer_balance(&txs, "MILLER COORS").unwrap(), None);
    }

    #[test]
    fn sums_are_exact_past_intermediate_overflow() {
        let txs = vec![
            Transaction::new("DANNON", i64::MAX, at(10)),
            Transaction::new("DANNON", 1, at(11)),
            Transaction::new("DANNON", -i64::MAX, at(12)),
        ];

        assert_eq!(payer_balance(&txs, "DANNON").unwrap(), Some(1));
        assert_eq!(
            payer_balances(&txs).unwrap(),
            vec![PayerBalance { payer: "DANNON".into(), points: 1 }]
        );
    }

    #[test]
    fn unrepresentable_balance_is_an_error() {
        let txs = vec![
            Transaction::new("DANNON", i64::MAX, at(10)),
            Transaction::new("DANNON", 1, at(11)),
        ];

        assert!(matches!(payer_balances(&txs).unwrap_err(), DomainError::Overflow(_)));
        assert!(matches!(payer_balance(&txs, "DANNON").unwrap_err(), DomainError::Overflow(_)));
    }

    #[test]
    fn chronological_sort_is_stable_on_ties() {
        let mut txs = vec![
            Transaction::new("B", 1, at(12)),
            Transaction::new("A", 2, at(10)),
            Transaction::new("C", 3, at(12)),
            Transaction::new("D", 4, at(10)),
        ];
        sort_chronologically(&mut txs);

        let payers: Vec<_> = txs.iter().map(|t| t.payer.as_str()).collect();
        assert_eq!(payers, vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn transaction_json_shape() {
        let t = Transaction::new("DANNON", 1000, Utc.with_ymd_and_hms(2020, 11, 2, 14, 0, 0).unwrap());
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["payer"], "DANNON");
        assert_eq!(json["points"], 1000);
        assert_eq!(json["timestamp"], "2020-11-02T14:00:00Z");

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    proptest! {
        /// Property: per-payer balance equals the sum of that payer's points,
        /// regardless of the order the transactions are listed in.
        #[test]
        fn balances_are_order_independent(
            entries in prop::collection::vec((0usize..4, -1_000i64..1_000i64, 0u32..24), 0..40)
        ) {
            let payers = ["ALPHA", "BRAVO", "CHARLIE", "DELTA"];
            let txs: Vec<Transaction> = entries
                .iter()
                .map(|(p, points, hour)| Transaction::new(payers[*p], *points, at(*hour)))
                .collect();

            let mut reversed = txs.clone();
            reversed.reverse();
            prop_assert_eq!(payer_balances(&txs).unwrap(), payer_balances(&reversed).unwrap());

            for payer in payers {
                let expected: Option<i64> = txs
                    .iter()
                    .filter(|t| t.payer == payer)
                    .map(|t| t.points)
                    .reduce(|a, b| a + b);
                prop_assert_eq!(payer_balance(&txs, payer).unwrap(), expected);
            }
        }
    }
}
