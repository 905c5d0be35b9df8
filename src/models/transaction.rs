//! Transaction model
//!
//! Represents a bank transaction as it arrived from the bank. Transactions
//! are read only; allocating them to buckets happens through parts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::money::Money;

/// A financial transaction reported by a bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    bank: String,
    source_account_id: String,
    amount: Money,
    description: String,
    date: NaiveDate,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        id: TransactionId,
        bank: impl Into<String>,
        source_account_id: impl Into<String>,
        amount: Money,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            bank: bank.into(),
            source_account_id: source_account_id.into(),
            amount,
            description: description.into(),
            date,
        }
    }

    /// The bank-assigned identifier
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    /// Name of the bank the transaction came from
    pub fn bank(&self) -> &str {
        &self.bank
    }

    /// Account the transaction was drawn on
    pub fn source_account_id(&self) -> &str {
        &self.source_account_id
    }

    /// Total amount of the transaction
    pub fn amount(&self) -> Money {
        self.amount
    }

    /// Description as reported by the bank
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Transaction date
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.bank,
            self.description,
            self.amount
        )
    }
}
