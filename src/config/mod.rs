//! Configuration module for budget-buckets
//!
//! Settings are loaded from an optional JSON file; every field has a
//! default so a missing or partial file is fine.

pub mod settings;

pub use settings::Settings;
