//! Memoization of `SQL_ID` computations.
//!
//! Provides the [`Cache`] abstraction, a bounded thread-safe LRU
//! implementation ([`HashLruCache`]), a pass-through implementation
//! ([`NoCache`]) and the [`SqlIdLookup`] façade that combines a cache with a
//! driver translating statement text into its native form.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod lookup;
pub mod lru;

pub use cache::{Cache, NoCache};
pub use error::CacheError;
pub use lookup::{NativeSql, NoDriver, SqlIdLookup};
pub use lru::HashLruCache;
