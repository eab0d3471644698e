//! Balance checks and FIFO redemption planning.
//!
//! Both functions are pure decisions: they inspect history and either reject
//! or describe the transactions to append. Persisting them is the caller's job.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use rewards_core::{DomainError, DomainResult};

use crate::transaction::{Transaction, narrow, points_total};

/// Decide whether a manual earn/adjust transaction may be recorded against
/// `history`, the account's current log (any order).
///
/// Positive transactions are always accepted. Zero or negative ones are
/// accepted only if the payer's current balance (absent = 0) covers them.
/// Either way the payer balance and the account total must stay within `i64`.
pub fn check_adjustment(history: &[Transaction], transaction: &Transaction) -> DomainResult<()> {
    if transaction.payer.trim().is_empty() {
        return Err(DomainError::validation("payer must not be blank"));
    }

    let points = i128::from(transaction.points);
    let current = points_total(history.iter().filter(|t| t.payer == transaction.payer));
    let after = current + points;

    if !transaction.is_earn() && after < 0 {
        return Err(DomainError::insufficient_balance(
            narrow(-points, "requested")?,
            narrow(current, &transaction.payer)?,
        ));
    }

    narrow(after, &transaction.payer)?;
    narrow(points_total(history) + points, "account")?;
    Ok(())
}

/// Plan the settlement transactions that redeem `amount` points.
///
/// Fails with `InsufficientBalance` when the account total (the sum of every
/// transaction in `history`) is below `amount`.
///
/// `history` must be ordered oldest first. Points are consumed from the oldest
/// transactions across all payers. `remaining` is decremented by each
/// transaction's raw points (not the clamped amount taken from it), so an
/// earlier redemption in the log hands its points back to the counter and the
/// scan stops where the running total of the signed timeline reaches `amount`.
///
/// Returned transactions are stamped `now`, ordered by the first time their
/// payer was touched during the scan, and never carry zero points. Their
/// points sum to `-amount`.
pub fn plan_spend(
    history: &[Transaction],
    amount: i64,
    now: DateTime<Utc>,
) -> DomainResult<Vec<Transaction>> {
    if amount <= 0 {
        return Err(DomainError::validation("spend amount must be positive"));
    }

    let mut balances: HashMap<&str, i128> = HashMap::new();
    for t in history {
        *balances.entry(t.payer.as_str()).or_insert(0) += i128::from(t.points);
    }
    let total: i128 = balances.values().sum();
    if total < i128::from(amount) {
        return Err(DomainError::insufficient_balance(amount, narrow(total, "account")?));
    }

    // Ends at or below zero: the prefix sums finish at `total >= amount`.
    let mut remaining = i128::from(amount);
    let mut order: Vec<&str> = Vec::new();
    let mut deltas: HashMap<&str, i128> = HashMap::new();

    for t in history {
        if remaining <= 0 {
            break;
        }

        let points = i128::from(t.points);
        let delta = deltas.entry(t.payer.as_str()).or_insert_with(|| {
            order.push(t.payer.as_str());
            0
        });
        *delta -= points.min(remaining);

        remaining -= points;
    }

    let mut settlement = Vec::with_capacity(order.len());
    for payer in order {
        let delta = deltas.get(payer).copied().unwrap_or(0);
        if delta == 0 {
            continue;
        }
        let balance = balances.get(payer).copied().unwrap_or(0);
        narrow(balance + delta, payer)?;
        settlement.push(Transaction::new(payer, narrow(delta, payer)?, now));
    }
    Ok(settlement)
}
