//! The cache abstraction shared by all implementations.

use std::borrow::Borrow;
use std::convert::Infallible;
use std::hash::Hash;

/// A memoizing key-value store.
///
/// Looks up a value by key and, if none is present, computes it with the
/// caller's loader and stores it, possibly evicting another entry. Keys are
/// looked up by their borrowed form, so a hit never needs an owned key.
///
/// Implementations must be safe to call from several threads at once and
/// must not hold internal locks while a loader runs. A loader may therefore
/// run more than once for the same key when callers race; it must be
/// idempotent.
pub trait Cache<K, V> {
    /// Returns the cached value for `key`, or computes it with `loader`.
    ///
    /// An error from `loader` is returned unchanged and leaves the cache as
    /// it was before the call.
    fn try_get<Q, F, E>(&self, key: &Q, loader: F) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: ToOwned<Owned = K> + Hash + Eq + ?Sized,
        F: FnOnce(&Q) -> Result<V, E>;

    /// Returns the cached value for `key`, or computes it with an infallible
    /// `loader`.
    fn get<Q, F>(&self, key: &Q, loader: F) -> V
    where
        K: Borrow<Q>,
        Q: ToOwned<Owned = K> + Hash + Eq + ?Sized,
        F: FnOnce(&Q) -> V,
    {
        match self.try_get(key, |key| Ok::<V, Infallible>(loader(key))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

/// A cache that stores nothing and runs the loader on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl<K, V> Cache<K, V> for NoCache {
    fn try_get<Q, F, E>(&self, key: &Q, loader: F) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: ToOwned<Owned = K> + Hash + Eq + ?Sized,
        F: FnOnce(&Q) -> Result<V, E>,
    {
        loader(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn no_cache_always_loads() {
        let calls = Cell::new(0);
        let cache = NoCache;
        let load = |i: &i32| {
            calls.set(calls.get() + 1);
            i * 2
        };
        assert_eq!(Cache::<i32, i32>::get(&cache, &1, load), 2);
        assert_eq!(Cache::<i32, i32>::get(&cache, &1, load), 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn no_cache_propagates_loader_error() {
        let cache = NoCache;
        let result: Result<String, &str> =
            Cache::<String, String>::try_get(&cache, "key", |_| Err("boom"));
        assert_eq!(result, Err("boom"));
    }
}
