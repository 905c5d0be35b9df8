//! budget-buckets - split bank transactions across budgeting buckets
//!
//! This library tracks how each bank transaction is divided into parts, each
//! part filed under a bucket, and refuses any change that would allocate more
//! than the transaction is worth.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Settings
//! - `error`: Custom error types
//! - `models`: Core data models (buckets, transactions, parts, money)
//! - `services`: Partitioner, transaction pool and the book facade
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_buckets::{Book, Money, Settings};
//!
//! let mut book = Book::new(Settings::default());
//! let rent = book.add_bucket("Rent")?;
//! book.add_transactions(transactions)?;
//! book.define_part(&txn_id, rent.id(), Money::from_units(500), "January rent")?;
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::Settings;
pub use error::{LedgerError, LedgerResult};
pub use models::{Bucket, BucketId, Money, PartId, Transaction, TransactionId, TransactionPart};
pub use services::{Book, BucketSummary, Partitioner, TransactionFilter, TransactionPool};
