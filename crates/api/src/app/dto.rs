use chrono::{DateTime, Utc};
use serde::Deserialize;

use rewards_ledger::Transaction;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddPointsRequest {
    pub payer: String,
    pub points: i64,
    pub timestamp: DateTime<Utc>,
}

impl AddPointsRequest {
    pub fn into_transaction(self) -> Transaction {
        Transaction::new(self.payer, self.points, self.timestamp)
    }
}

#[derive(Debug, Deserialize)]
pub struct SpendPointsRequest {
    pub points: i64,
}
