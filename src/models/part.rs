//! Part and TransactionPart models
//!
//! A `Part` files a portion of a transaction's amount under a bucket. Parts
//! are owned by the partitioner; callers only ever see `TransactionPart`
//! snapshots copied out of the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use super::ids::{BucketId, PartId, TransactionId};
use super::money::Money;

/// An allocation of part of a transaction to a bucket
///
/// Every field is validated on construction. Changes produce a new,
/// revalidated value rather than mutating in place, so the ledger can swap
/// it in only once it is known to be valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Part {
    id: PartId,
    transaction_id: TransactionId,
    bucket_id: BucketId,
    amount: Money,
    description: String,
}

impl Part {
    /// Create a new part with a freshly generated ID
    pub(crate) fn new(
        transaction_id: TransactionId,
        bucket_id: BucketId,
        amount: Money,
        description: &str,
    ) -> Result<Self, PartValidationError> {
        Self {
            id: PartId::new(),
            transaction_id,
            bucket_id,
            amount,
            description: description.to_string(),
        }
        .validated()
    }

    fn validated(self) -> Result<Self, PartValidationError> {
        if self.bucket_id.is_nil() {
            return Err(PartValidationError::NilBucketId);
        }
        if !self.amount.is_positive() {
            return Err(PartValidationError::NonPositiveAmount(self.amount));
        }
        if self.description.trim().is_empty() {
            return Err(PartValidationError::BlankDescription);
        }
        Ok(self)
    }

    pub(crate) fn id(&self) -> PartId {
        self.id
    }

    pub(crate) fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub(crate) fn bucket_id(&self) -> BucketId {
        self.bucket_id
    }

    pub(crate) fn amount(&self) -> Money {
        self.amount
    }

    /// Copy of this part with a different amount
    pub(crate) fn with_amount(&self, amount: Money) -> Result<Self, PartValidationError> {
        Self {
            amount,
            ..self.clone()
        }
        .validated()
    }

    /// Copy of this part filed under a different bucket
    pub(crate) fn with_bucket(&self, bucket_id: BucketId) -> Result<Self, PartValidationError> {
        Self {
            bucket_id,
            ..self.clone()
        }
        .validated()
    }

    /// Copy of this part with a different description
    pub(crate) fn with_description(&self, description: &str) -> Result<Self, PartValidationError> {
        Self {
            description: description.to_string(),
            ..self.clone()
        }
        .validated()
    }

    /// Read-only snapshot for handing out to callers
    pub(crate) fn snapshot(&self) -> TransactionPart {
        TransactionPart {
            part_id: self.id,
            transaction_id: self.transaction_id.clone(),
            bucket_id: self.bucket_id,
            amount: self.amount,
            description: self.description.clone(),
        }
    }
}

/// Read-only view of a part at the moment it was queried
///
/// Two snapshots are equal when they describe the same part, even if the
/// part changed between the two queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPart {
    part_id: PartId,
    transaction_id: TransactionId,
    bucket_id: BucketId,
    amount: Money,
    description: String,
}

impl TransactionPart {
    pub fn part_id(&self) -> PartId {
        self.part_id
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn bucket_id(&self) -> BucketId {
        self.bucket_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for TransactionPart {
    fn eq(&self, other: &Self) -> bool {
        self.part_id == other.part_id
    }
}

impl Eq for TransactionPart {}

impl Hash for TransactionPart {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.part_id.hash(state);
    }
}

impl fmt::Display for TransactionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.part_id, self.transaction_id, self.amount, self.description
        )
    }
}

/// Validation errors for parts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartValidationError {
    #[error("bucket id cannot be the nil UUID")]
    NilBucketId,
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Money),
    #[error("description cannot be blank")]
    BlankDescription,
}

impl PartValidationError {
    /// Name of the offending argument
    pub fn argument(&self) -> &'static str {
        match self {
            Self::NilBucketId => "bucket_id",
            Self::NonPositiveAmount(_) => "amount",
            Self::BlankDescription => "description",
        }
    }
}
