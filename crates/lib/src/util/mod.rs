//! Shared utilities.
//!
//! Serialization helpers used by producers, plus test helpers.

pub mod yaml;

#[cfg(test)]
pub mod testutil;
