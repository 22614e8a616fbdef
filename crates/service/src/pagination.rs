//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Offset pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// page size, 1..=100
    pub limit: u64,
    /// rows to skip
    pub offset: u64,
}

impl Pagination {
    /// Apply defaults and clamp raw query values.
    pub fn from_query(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) => l.clamp(1, MAX_LIMIT as i64) as u64,
            None => DEFAULT_LIMIT,
        };
        let offset = offset.unwrap_or(0).max(0) as u64;
        Self { limit, offset }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { limit: DEFAULT_LIMIT, offset: 0 } }
}
