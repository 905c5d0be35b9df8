//! Service layer for budget-buckets
//!
//! The service layer holds the bookkeeping rules: the partitioner that keeps
//! parts from overallocating a transaction, the pool of bank transactions, and
//! the book that resolves IDs across both and records changes.

pub mod book;
pub mod partitioner;
pub mod pool;

pub use book::{Book, BucketSummary};
pub use partitioner::Partitioner;
pub use pool::{TransactionFilter, TransactionPool};
