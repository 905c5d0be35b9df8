//! Partitioner service
//!
//! The in-memory ledger of transaction parts. It is the only place parts are
//! created, changed or removed, and it guarantees that for every transaction
//! the parts filed against it never add up to more than the transaction's
//! amount.

use tracing::debug;

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::part::Part;
use crate::models::{Bucket, BucketId, Money, PartId, Transaction, TransactionId, TransactionPart};

/// Ledger of transaction-to-bucket allocations
///
/// Parts are kept in insertion order, which is also the order queries
/// return them in. A failed operation never changes the ledger.
#[derive(Debug, Clone)]
pub struct Partitioner {
    parts: Vec<Part>,
    currency_symbol: String,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new()
    }
}

impl Partitioner {
    /// Create an empty ledger with default settings
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    /// Create an empty ledger that formats amounts using the given settings
    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            parts: Vec::new(),
            currency_symbol: settings.currency_symbol.clone(),
        }
    }

    /// Number of parts in the ledger
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the ledger holds no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Snapshots of every part, in ledger order
    pub fn parts(&self) -> Vec<TransactionPart> {
        self.parts.iter().map(Part::snapshot).collect()
    }

    /// File part of `transaction` under `bucket`
    ///
    /// Fails with `InvalidArgument` for a blank description or an amount
    /// that is not strictly positive, and with `InvalidOperation` if the
    /// amount would take the transaction's parts past its total.
    pub fn define_part(
        &mut self,
        transaction: &Transaction,
        bucket: &Bucket,
        amount: Money,
        description: &str,
    ) -> LedgerResult<PartId> {
        let part = Part::new(transaction.id().clone(), bucket.id(), amount, description)?;
        self.enforce_amount_validation(transaction, amount)?;

        let id = part.id();
        self.parts.push(part);

        debug!(
            part_id = %id,
            transaction_id = %transaction.id(),
            bucket_id = %bucket.id(),
            amount = %amount,
            "defined part"
        );
        Ok(id)
    }

    /// Look up a part by ID
    pub fn get_part(&self, part_id: PartId) -> Option<TransactionPart> {
        self.find(part_id).map(|idx| self.parts[idx].snapshot())
    }

    /// All parts filed against a transaction, in ledger order
    pub fn get_transaction_parts(&self, transaction_id: &TransactionId) -> Vec<TransactionPart> {
        self.parts
            .iter()
            .filter(|p| p.transaction_id() == transaction_id)
            .map(Part::snapshot)
            .collect()
    }

    /// All parts filed under a bucket, in ledger order
    pub fn get_parts_in_bucket(&self, bucket_id: BucketId) -> Vec<TransactionPart> {
        self.parts
            .iter()
            .filter(|p| p.bucket_id() == bucket_id)
            .map(Part::snapshot)
            .collect()
    }

    /// Sum of the parts filed against a transaction
    pub fn partitioned_amount(&self, transaction_id: &TransactionId) -> Money {
        self.parts
            .iter()
            .filter(|p| p.transaction_id() == transaction_id)
            .map(Part::amount)
            .fold(Money::zero(), Money::saturating_add)
    }

    /// Sum of the parts filed under a bucket
    pub fn bucket_total(&self, bucket_id: BucketId) -> Money {
        self.parts
            .iter()
            .filter(|p| p.bucket_id() == bucket_id)
            .map(Part::amount)
            .fold(Money::zero(), Money::saturating_add)
    }

    /// How much of the transaction is not yet filed under any bucket
    pub fn calculate_unpartitioned_amount(&self, transaction: &Transaction) -> Money {
        transaction.amount() - self.partitioned_amount(transaction.id())
    }

    /// Whether every unit of the transaction has been filed somewhere
    pub fn is_fully_partitioned(&self, transaction: &Transaction) -> bool {
        self.calculate_unpartitioned_amount(transaction).is_zero()
    }

    /// Remove a part, returning what was removed
    pub fn remove_part(&mut self, part_id: PartId) -> Option<TransactionPart> {
        let idx = self.find(part_id)?;
        let removed = self.parts.remove(idx);

        debug!(part_id = %part_id, "removed part");
        Some(removed.snapshot())
    }

    /// Change the amount of an existing part
    ///
    /// `transaction` must be the transaction the part was filed against. Only
    /// the difference between the new and the current amount is checked
    /// against the transaction's remaining headroom.
    pub fn change_amount(
        &mut self,
        part_id: PartId,
        transaction: &Transaction,
        new_amount: Money,
    ) -> LedgerResult<TransactionPart> {
        let idx = self
            .find(part_id)
            .ok_or_else(|| LedgerError::part_not_found(part_id.to_string()))?;
        let current = &self.parts[idx];

        if current.transaction_id() != transaction.id() {
            return Err(LedgerError::invalid_argument(
                "transaction",
                format!(
                    "part {} belongs to transaction {}, not {}",
                    part_id,
                    current.transaction_id(),
                    transaction.id()
                ),
            ));
        }

        let updated = current.with_amount(new_amount)?;
        self.enforce_amount_validation(transaction, new_amount - current.amount())?;

        self.parts[idx] = updated;
        debug!(part_id = %part_id, amount = %new_amount, "changed part amount");
        Ok(self.parts[idx].snapshot())
    }

    /// Refile a part under a different bucket
    pub fn move_part(&mut self, part_id: PartId, new_bucket: &Bucket) -> LedgerResult<TransactionPart> {
        self.replace(part_id, |part| part.with_bucket(new_bucket.id()))?;

        debug!(part_id = %part_id, bucket_id = %new_bucket.id(), "moved part");
        self.snapshot_of(part_id)
    }

    /// Change the description of a part
    pub fn change_description(
        &mut self,
        part_id: PartId,
        new_description: &str,
    ) -> LedgerResult<TransactionPart> {
        self.replace(part_id, |part| part.with_description(new_description))?;

        debug!(part_id = %part_id, "changed part description");
        self.snapshot_of(part_id)
    }

    fn find(&self, part_id: PartId) -> Option<usize> {
        self.parts.iter().position(|p| p.id() == part_id)
    }

    fn snapshot_of(&self, part_id: PartId) -> LedgerResult<TransactionPart> {
        self.get_part(part_id)
            .ok_or_else(|| LedgerError::part_not_found(part_id.to_string()))
    }

    /// Swap a part for a validated replacement built from it
    fn replace<F, E>(&mut self, part_id: PartId, build: F) -> LedgerResult<()>
    where
        F: FnOnce(&Part) -> Result<Part, E>,
        LedgerError: From<E>,
    {
        let idx = self
            .find(part_id)
            .ok_or_else(|| LedgerError::part_not_found(part_id.to_string()))?;
        let replacement = build(&self.parts[idx])?;
        self.parts[idx] = replacement;
        Ok(())
    }

    /// Reject `amount` if it would overallocate `transaction`
    ///
    /// `amount` may be a negative delta when a part shrinks.
    fn enforce_amount_validation(&self, transaction: &Transaction, amount: Money) -> LedgerResult<()> {
        let total = transaction.amount();

        if amount > total {
            debug!(transaction_id = %transaction.id(), amount = %amount, "part larger than transaction");
            return Err(LedgerError::InvalidOperation(format!(
                "Cannot create part of {} larger than transaction {} total of {}",
                self.format(amount),
                transaction.id(),
                self.format(total)
            )));
        }

        let cumulative = self.partitioned_amount(transaction.id());
        // Overflow means the combined amount cannot fit under any total
        let overallocated = cumulative
            .checked_add(amount)
            .map_or(true, |combined| combined > total);
        if overallocated {
            debug!(
                transaction_id = %transaction.id(),
                amount = %amount,
                partitioned = %cumulative,
                "part would overallocate transaction"
            );
            return Err(LedgerError::InvalidOperation(format!(
                "Amount {} would exceed transaction {} total of {} when combined with {} already partitioned",
                self.format(amount),
                transaction.id(),
                self.format(total),
                self.format(cumulative)
            )));
        }

        Ok(())
    }

    fn format(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
