//! Book service
//!
//! Ties buckets, the transaction pool and the partitioner together behind an
//! ID-based API, resolving every ID before the partitioner sees it.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Bucket, BucketId, Money, PartId, Transaction, TransactionId, TransactionPart};

use super::partitioner::Partitioner;
use super::pool::TransactionPool;

/// Totals for a single bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSummary {
    pub bucket_id: BucketId,
    pub name: String,
    pub total: Money,
    pub part_count: usize,
}

/// A complete set of books: buckets, transactions and the parts between them
#[derive(Debug)]
pub struct Book {
    settings: Settings,
    buckets: Vec<Bucket>,
    pool: TransactionPool,
    partitioner: Partitioner,
}

impl Default for Book {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Book {
    /// Create empty books using the given settings
    pub fn new(settings: Settings) -> Self {
        Self {
            partitioner: Partitioner::with_settings(&settings),
            settings,
            buckets: Vec::new(),
            pool: TransactionPool::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pool(&self) -> &TransactionPool {
        &self.pool
    }

    pub fn partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    // === Buckets ===

    /// Create and register a bucket with a fresh ID
    pub fn add_bucket(&mut self, name: &str) -> LedgerResult<Bucket> {
        let bucket = Bucket::create(name)?;
        self.insert_bucket(bucket.clone())?;
        Ok(bucket)
    }

    /// Register an existing bucket
    ///
    /// Bucket IDs and names (case-insensitive) must be unique.
    pub fn insert_bucket(&mut self, bucket: Bucket) -> LedgerResult<()> {
        if self.bucket(bucket.id()).is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Bucket",
                identifier: bucket.id().to_string(),
            });
        }
        if self.bucket_by_name(bucket.name()).is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Bucket",
                identifier: bucket.name().to_string(),
            });
        }

        info!(bucket_id = %bucket.id(), name = bucket.name(), "registered bucket");
        self.buckets.push(bucket);
        Ok(())
    }

    /// Get a bucket by ID
    pub fn bucket(&self, id: BucketId) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.id() == id)
    }

    /// Get a bucket by name (case-insensitive)
    pub fn bucket_by_name(&self, name: &str) -> Option<&Bucket> {
        let name = name.trim().to_lowercase();
        self.buckets
            .iter()
            .find(|b| b.name().to_lowercase() == name)
    }

    /// Find a bucket by name or ID string
    pub fn find_bucket(&self, identifier: &str) -> Option<&Bucket> {
        if let Some(bucket) = self.bucket_by_name(identifier) {
            return Some(bucket);
        }

        identifier
            .parse::<BucketId>()
            .ok()
            .and_then(|id| self.bucket(id))
    }

    /// All buckets in registration order
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    // === Transactions ===

    /// Add transactions to the pool; all or nothing
    pub fn add_transactions<I>(&mut self, transactions: I) -> LedgerResult<usize>
    where
        I: IntoIterator<Item = Transaction>,
    {
        let added = self.pool.add_transactions(transactions)?;
        info!(added, pooled = self.pool.len(), "added transactions");
        Ok(added)
    }

    /// Look up a transaction in the pool
    pub fn transaction(&self, id: &TransactionId) -> LedgerResult<&Transaction> {
        self.pool
            .get(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))
    }

    // === Parts ===

    /// File part of a pooled transaction under a registered bucket
    pub fn define_part(
        &mut self,
        transaction_id: &TransactionId,
        bucket_id: BucketId,
        amount: Money,
        description: &str,
    ) -> LedgerResult<PartId> {
        let transaction = self
            .pool
            .get(transaction_id)
            .ok_or_else(|| LedgerError::transaction_not_found(transaction_id.to_string()))?;
        let bucket = self
            .buckets
            .iter()
            .find(|b| b.id() == bucket_id)
            .ok_or_else(|| LedgerError::bucket_not_found(bucket_id.to_string()))?;

        self.partitioner
            .define_part(transaction, bucket, amount, description)
    }

    pub fn get_part(&self, part_id: PartId) -> Option<TransactionPart> {
        self.partitioner.get_part(part_id)
    }

    /// Change a part's amount, checked against its own transaction
    pub fn change_amount(&mut self, part_id: PartId, new_amount: Money) -> LedgerResult<TransactionPart> {
        let part = self.existing_part(part_id)?;
        let transaction = self.pool.get(part.transaction_id()).ok_or_else(|| {
            LedgerError::transaction_not_found(part.transaction_id().to_string())
        })?;

        self.partitioner
            .change_amount(part_id, transaction, new_amount)
    }

    /// Refile a part under another registered bucket
    pub fn move_part(&mut self, part_id: PartId, bucket_id: BucketId) -> LedgerResult<TransactionPart> {
        self.existing_part(part_id)?;
        let bucket = self
            .buckets
            .iter()
            .find(|b| b.id() == bucket_id)
            .ok_or_else(|| LedgerError::bucket_not_found(bucket_id.to_string()))?;

        self.partitioner.move_part(part_id, bucket)
    }

    pub fn change_description(
        &mut self,
        part_id: PartId,
        new_description: &str,
    ) -> LedgerResult<TransactionPart> {
        self.partitioner
            .change_description(part_id, new_description)
    }

    /// Remove a part, returning what was removed
    pub fn remove_part(&mut self, part_id: PartId) -> Option<TransactionPart> {
        let removed = self.partitioner.remove_part(part_id);
        if removed.is_none() {
            debug!(part_id = %part_id, "no part to remove");
        }
        removed
    }

    // === Reporting ===

    /// How much of a pooled transaction is not yet filed under a bucket
    pub fn unpartitioned_amount(&self, transaction_id: &TransactionId) -> LedgerResult<Money> {
        let transaction = self.transaction(transaction_id)?;
        Ok(self.partitioner.calculate_unpartitioned_amount(transaction))
    }

    /// Pooled transactions with money left to allocate, in pool order
    pub fn unpartitioned_transactions(&self) -> Vec<(&Transaction, Money)> {
        self.pool
            .transactions()
            .iter()
            .map(|t| (t, self.partitioner.calculate_unpartitioned_amount(t)))
            .filter(|(_, remaining)| remaining.is_positive())
            .collect()
    }

    /// Totals for every registered bucket, in registration order
    pub fn bucket_summaries(&self) -> Vec<BucketSummary> {
        self.buckets
            .iter()
            .map(|bucket| BucketSummary {
                bucket_id: bucket.id(),
                name: bucket.name().to_string(),
                total: self.partitioner.bucket_total(bucket.id()),
                part_count: self.partitioner.get_parts_in_bucket(bucket.id()).len(),
            })
            .collect()
    }

    /// One line per bucket, amounts in the configured currency
    pub fn format_bucket_summaries(&self) -> Vec<String> {
        self.bucket_summaries()
            .iter()
            .map(|s| {
                format!(
                    "{}: {} ({} parts)",
                    s.name,
                    s.total.format_with_symbol(&self.settings.currency_symbol),
                    s.part_count
                )
            })
            .collect()
    }

    fn existing_part(&self, part_id: PartId) -> LedgerResult<TransactionPart> {
        self.partitioner
            .get_part(part_id)
            .ok_or_else(|| LedgerError::part_not_found(part_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(id: &str, units: i64) -> Transaction {
        Transaction::new(
            TransactionId::new(id).unwrap(),
            "Halifax",
            "00-03-40:00645170",
            Money::from_units(units),
            "DD: COMPANYNAME 30490983975",
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
        )
    }

    fn tid(id: &str) -> TransactionId {
        TransactionId::new(id).unwrap()
    }

    #[test]
    fn test_add_bucket_rejects_duplicate_name() {
        let mut book = Book::default();
        book.add_bucket("Groceries").unwrap();

        let err = book.add_bucket("groceries").unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(book.buckets().len(), 1);
    }

    #[test]
    fn test_insert_bucket_rejects_duplicate_id() {
        let mut book = Book::default();
        let bucket = book.add_bucket("Groceries").unwrap();

        let same_id = Bucket::new(bucket.id(), "Rent").unwrap();
        assert!(book.insert_bucket(same_id).unwrap_err().is_duplicate());
    }

    #[test]
    fn test_add_bucket_rejects_blank_name() {
        let mut book = Book::default();
        let err = book.add_bucket("  ").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidArgument {
                argument: "name",
                ..
            }
        ));
    }

    #[test]
    fn test_find_bucket_by_name_or_id() {
        let mut book = Book::default();
        let bucket = book.add_bucket("Rent").unwrap();

        assert_eq!(book.find_bucket("rent").unwrap().id(), bucket.id());
        assert_eq!(
            book.find_bucket(&bucket.id().as_uuid().to_string()).unwrap().id(),
            bucket.id()
        );
        assert!(book.find_bucket("Fun").is_none());
    }

    #[test]
    fn test_define_part_resolves_ids() {
        let mut book = Book::default();
        let bucket = book.add_bucket("Rent").unwrap();
        book.add_transactions(vec![txn("t1", 100)]).unwrap();

        let id = book
            .define_part(&tid("t1"), bucket.id(), Money::from_units(60), "rent share")
            .unwrap();

        assert_eq!(book.get_part(id).unwrap().bucket_id(), bucket.id());
        assert_eq!(book.unpartitioned_amount(&tid("t1")).unwrap(), Money::from_units(40));
    }

    #[test]
    fn test_define_part_unknown_references() {
        let mut book = Book::default();
        let bucket = book.add_bucket("Rent").unwrap();
        book.add_transactions(vec![txn("t1", 100)]).unwrap();

        let err = book
            .define_part(&tid("t2"), bucket.id(), Money::from_units(1), "x")
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotFound {
                entity_type: "Transaction",
                ..
            }
        ));

        let err = book
            .define_part(&tid("t1"), BucketId::new(), Money::from_units(1), "x")
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotFound {
                entity_type: "Bucket",
                ..
            }
        ));
        assert!(book.partitioner().is_empty());
    }

    #[test]
    fn test_change_amount_uses_parts_own_transaction() {
        let mut book = Book::default();
        let bucket = book.add_bucket("Rent").unwrap();
        book.add_transactions(vec![txn("t1", 100), txn("t2", 1000)]).unwrap();

        let id = book
            .define_part(&tid("t1"), bucket.id(), Money::from_units(50), "rent")
            .unwrap();

        assert_eq!(
            book.change_amount(id, Money::from_units(100)).unwrap().amount(),
            Money::from_units(100)
        );
        assert!(book
            .change_amount(id, Money::from_units(101))
            .unwrap_err()
            .is_invalid_operation());
        assert!(book
            .change_amount(PartId::new(), Money::from_units(1))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_move_part_requires_registered_bucket() {
        let mut book = Book::default();
        let rent = book.add_bucket("Rent").unwrap();
        let fun = book.add_bucket("Fun").unwrap();
        book.add_transactions(vec![txn("t1", 100)]).unwrap();

        let id = book
            .define_part(&tid("t1"), rent.id(), Money::from_units(50), "rent")
            .unwrap();

        assert!(book.move_part(id, BucketId::new()).unwrap_err().is_not_found());
        assert_eq!(book.move_part(id, fun.id()).unwrap().bucket_id(), fun.id());
    }

    #[test]
    fn test_summaries_and_unpartitioned_transactions() {
        let mut book = Book::default();
        let rent = book.add_bucket("Rent").unwrap();
        let fun = book.add_bucket("Fun").unwrap();
        book.add_transactions(vec![txn("t1", 100), txn("t2", 30)]).unwrap();

        book.define_part(&tid("t1"), rent.id(), Money::from_units(70), "rent")
            .unwrap();
        book.define_part(&tid("t1"), fun.id(), Money::from_units(30), "cinema")
            .unwrap();
        book.define_part(&tid("t2"), fun.id(), Money::from_units(10), "snacks")
            .unwrap();

        let summaries = book.bucket_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].total, Money::from_units(70));
        assert_eq!(summaries[1].total, Money::from_units(40));
        assert_eq!(summaries[1].part_count, 2);

        let remaining = book.unpartitioned_transactions();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].0.id().as_str(), "t2");
        assert_eq!(remaining[0].1, Money::from_units(20));

        assert_eq!(
            book.format_bucket_summaries(),
            vec!["Rent: $70.00 (1 parts)", "Fun: $40.00 (2 parts)"]
        );
    }

    #[test]
    fn test_part_lifecycle() {
        let mut book = Book::default();
        let bucket = book.add_bucket("Rent").unwrap();
        book.add_transactions(vec![txn("t1", 100)]).unwrap();

        let id = book
            .define_part(&tid("t1"), bucket.id(), Money::from_units(50), "rent")
            .unwrap();
        book.change_amount(id, Money::from_units(75)).unwrap();

        let part = book.change_description(id, "rent and bills").unwrap();
        assert_eq!(part.description(), "rent and bills");
        assert_eq!(part.amount(), Money::from_units(75));

        assert_eq!(book.remove_part(id).unwrap().part_id(), id);
        assert!(book.get_part(id).is_none());
        assert!(book.remove_part(id).is_none());
        assert_eq!(book.unpartitioned_amount(&tid("t1")).unwrap(), Money::from_units(100));
    }

    #[test]
    fn test_failed_operations_leave_book_unchanged() {
        let mut book = Book::default();
        let bucket = book.add_bucket("Rent").unwrap();
        book.add_transactions(vec![txn("t1", 100)]).unwrap();

        let id = book
            .define_part(&tid("t1"), bucket.id(), Money::from_units(60), "rent")
            .unwrap();

        assert!(book
            .define_part(&tid("t1"), bucket.id(), Money::from_units(41), "too much")
            .is_err());
        assert!(book.change_amount(id, Money::from_units(101)).is_err());
        assert!(book.change_description(id, " ").is_err());
        assert!(book
            .add_transactions(vec![txn("t2", 5), txn("t1", 5)])
            .is_err());

        assert_eq!(book.partitioner().len(), 1);
        assert_eq!(book.pool().len(), 1);
        let part = book.get_part(id).unwrap();
        assert_eq!(part.amount(), Money::from_units(60));
        assert_eq!(part.description(), "rent");
    }

    #[test]
    fn test_bucket_names_compare_unicode_case_insensitively() {
        let mut book = Book::default();
        let savings = book.add_bucket("Épargne").unwrap();

        assert!(book.add_bucket("épargne").unwrap_err().is_duplicate());
        assert_eq!(book.find_bucket("ÉPARGNE").unwrap().id(), savings.id());
        assert_eq!(book.buckets().len(), 1);
    }

    #[test]
    fn test_summaries_use_configured_currency() {
        let settings = Settings {
            currency_symbol: "£".to_string(),
            ..Settings::default()
        };
        let mut book = Book::new(settings);
        let bucket = book.add_bucket("Rent").unwrap();
        book.add_transactions(vec![txn("t1", 100)]).unwrap();
        book.define_part(&tid("t1"), bucket.id(), Money::from_cents(1250), "rent")
            .unwrap();

        assert_eq!(book.format_bucket_summaries(), vec!["Rent: £12.50 (1 parts)"]);
    }
}
