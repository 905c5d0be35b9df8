//! Transaction pool
//!
//! Holds the read-only bank transactions that parts are carved out of, and
//! answers filtered queries over them.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction, TransactionId};

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by bank name (case-insensitive)
    pub bank: Option<String>,
    /// Filter by source account
    pub source_account_id: Option<String>,
    /// Only transactions strictly below this amount
    pub below: Option<Money>,
    /// Case-insensitive substring of the bank description
    pub description: Option<String>,
    /// Filter by date range start (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end (inclusive)
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by bank
    pub fn bank(mut self, bank: impl Into<String>) -> Self {
        self.bank = Some(bank.into());
        self
    }

    /// Filter by source account
    pub fn source_account(mut self, account_id: impl Into<String>) -> Self {
        self.source_account_id = Some(account_id.into());
        self
    }

    /// Only transactions for less than `amount`
    pub fn below(mut self, amount: Money) -> Self {
        self.below = Some(amount);
        self
    }

    /// Filter by description text
    pub fn description_contains(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if let Some(bank) = &self.bank {
            if !txn.bank().eq_ignore_ascii_case(bank) {
                return false;
            }
        }
        if let Some(account) = &self.source_account_id {
            if txn.source_account_id() != account {
                return false;
            }
        }
        if let Some(ceiling) = self.below {
            if txn.amount() >= ceiling {
                return false;
            }
        }
        if let Some(text) = &self.description {
            if !txn
                .description()
                .to_lowercase()
                .contains(&text.to_lowercase())
            {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if txn.date() < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if txn.date() > end {
                return false;
            }
        }
        true
    }
}

/// In-memory pool of bank transactions, unique by transaction ID
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    transactions: Vec<Transaction>,
}

impl TransactionPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single transaction
    pub fn add_transaction(&mut self, transaction: Transaction) -> LedgerResult<()> {
        if self.contains(transaction.id()) {
            return Err(duplicate(transaction.id()));
        }
        self.transactions.push(transaction);
        Ok(())
    }

    /// Add a batch of transactions
    ///
    /// Either every transaction is added or none are. Returns the number added.
    pub fn add_transactions<I>(&mut self, transactions: I) -> LedgerResult<usize>
    where
        I: IntoIterator<Item = Transaction>,
    {
        let batch: Vec<Transaction> = transactions.into_iter().collect();

        let mut seen = HashSet::with_capacity(batch.len());
        for txn in &batch {
            if self.contains(txn.id()) || !seen.insert(txn.id()) {
                return Err(duplicate(txn.id()));
            }
        }

        let added = batch.len();
        self.transactions.extend(batch);
        Ok(added)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    /// Whether a transaction with this ID is in the pool
    pub fn contains(&self, id: &TransactionId) -> bool {
        self.get(id).is_some()
    }

    /// All transactions in the order they were added
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transactions matching a filter, in the order they were added
    pub fn list(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let matching = self.transactions.iter().filter(|t| filter.matches(t));
        match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

fn duplicate(id: &TransactionId) -> LedgerError {
    LedgerError::Duplicate {
        entity_type: "Transaction",
        identifier: id.to_string(),
    }
}
