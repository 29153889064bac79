//! Limit/offset clamping shared by list queries.

/// Default page size for history listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum page size for history listings.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a caller-provided limit into `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a caller-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
