//! Error types for cache construction.

/// Errors that can occur when building a cache.
///
/// Lookups themselves never fail on their own account: the only error a
/// lookup returns is the one produced by the caller's loader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// A bounded cache was requested with room for no entries.
    #[error("cache capacity must be positive but was: {0}")]
    InvalidCapacity(usize),
}
