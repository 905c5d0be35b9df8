//! Bucket model
//!
//! Buckets are user-defined categories that hold transaction parts.
//! A bucket is immutable once constructed.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::ids::BucketId;

/// A user-defined category that parts of transactions are filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    id: BucketId,
    name: String,
}

impl Bucket {
    /// Create a bucket with a caller-supplied ID
    pub fn new(id: BucketId, name: impl Into<String>) -> Result<Self, BucketValidationError> {
        if id.is_nil() {
            return Err(BucketValidationError::NilId);
        }

        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(BucketValidationError::EmptyName);
        }

        Ok(Self {
            id,
            name: name.to_string(),
        })
    }

    /// Create a bucket with a freshly generated ID
    pub fn create(name: impl Into<String>) -> Result<Self, BucketValidationError> {
        Self::new(BucketId::new(), name)
    }

    /// The bucket's unique identifier
    pub fn id(&self) -> BucketId {
        self.id
    }

    /// The bucket's display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for buckets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketValidationError {
    #[error("bucket id cannot be the nil UUID")]
    NilId,
    #[error("bucket name cannot be empty")]
    EmptyName,
}

impl BucketValidationError {
    /// Name of the offending argument
    pub fn argument(&self) -> &'static str {
        match self {
            Self::NilId => "id",
            Self::EmptyName => "name",
        }
    }
}
