//! Core data models for budget-buckets
//!
//! This module contains the data structures that represent the bookkeeping
//! domain: buckets, bank transactions, and the parts that split one across
//! the other.

pub mod bucket;
pub mod ids;
pub mod money;
pub mod part;
pub mod transaction;

pub use bucket::{Bucket, BucketValidationError};
pub use ids::{BucketId, PartId, TransactionId, TransactionIdError};
pub use money::{Money, MoneyParseError};
pub use part::{PartValidationError, TransactionPart};
pub use transaction::Transaction;
