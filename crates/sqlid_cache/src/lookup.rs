//! Cached `SQL_ID` lookups for driver-level and native statement text.
//!
//! Applications usually hold the statement text as written for their
//! database driver (`?` placeholders and the like), while the `SQL_ID` is
//! defined over the native text the database actually receives. The driver
//! owns that translation; [`SqlIdLookup`] asks it through [`NativeSql`] on a
//! cache miss and memoizes the result under the text the caller passed.

use std::convert::Infallible;

use sqlid_core::SqlId;
use tracing::debug;

use crate::cache::Cache;
use crate::error::CacheError;
use crate::lru::HashLruCache;

/// Translates driver-level statement text into native statement text.
pub trait NativeSql {
    /// The error reported by the driver.
    type Error;

    /// Returns the native form of `sql`.
    fn native_sql(&self, sql: &str) -> Result<String, Self::Error>;
}

/// A driver whose statement text is already native.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDriver;

impl NativeSql for NoDriver {
    type Error = Infallible;

    fn native_sql(&self, sql: &str) -> Result<String, Self::Error> {
        Ok(sql.to_owned())
    }
}

/// Memoizing `SQL_ID` lookup over a driver and a cache.
///
/// Both lookup methods share one cache keyed by the text passed in.
pub struct SqlIdLookup<D, C = HashLruCache<String, SqlId>> {
    driver: D,
    cache: C,
}

impl<D: NativeSql> SqlIdLookup<D> {
    /// Creates a lookup backed by a [`HashLruCache`] of `capacity` entries.
    pub fn with_capacity(driver: D, capacity: usize) -> Result<Self, CacheError> {
        Ok(Self::new(driver, HashLruCache::new(capacity)?))
    }
}

impl<D, C> SqlIdLookup<D, C>
where
    D: NativeSql,
    C: Cache<String, SqlId>,
{
    /// Creates a lookup over an arbitrary cache implementation.
    pub fn new(driver: D, cache: C) -> Self {
        Self { driver, cache }
    }

    /// Returns the `SQL_ID` of native statement text.
    pub fn sql_id_of_native(&self, native_sql: &str) -> SqlId {
        self.cache.get(native_sql, sqlid_core::compute)
    }

    /// Returns the `SQL_ID` of driver-level statement text.
    ///
    /// On a miss the driver translates `sql` first. A driver error is
    /// returned as is and nothing is cached.
    pub fn sql_id_of_driver_text(&self, sql: &str) -> Result<SqlId, D::Error> {
        self.cache.try_get(sql, |sql| {
            let native = self.driver.native_sql(sql)?;
            debug!(native_len = native.len(), "translated statement to native text");
            Ok(sqlid_core::compute(&native))
        })
    }

    /// The driver used for translation.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The underlying cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }
}
