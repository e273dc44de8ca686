//! Bounded least-recently-used cache guarded by a single mutex.
//!
//! Entries live in an arena of nodes addressed by index and threaded into a
//! doubly linked recency list, with a hash map from key to node index. The
//! mutex only covers map and list updates. Loaders run with the lock
//! released; on the way back in the key is looked up again and, if a
//! concurrent caller stored it first, that stored value wins and the freshly
//! computed one is dropped.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::Cache;
use crate::error::CacheError;

/// Upper bound on the number of map slots reserved up front.
const PREALLOCATE_LIMIT: usize = 1024;

/// One cache entry plus its position in the recency list.
struct Node<K, V> {
    key: K,
    value: V,
    /// Neighbor towards the most recently used end.
    newer: Option<usize>,
    /// Neighbor towards the least recently used end.
    older: Option<usize>,
}

/// The state protected by the cache mutex.
///
/// Invariants: `index` and `nodes` have the same length, every node is on the
/// list exactly once, and `most_recent`/`least_recent` are `None` only when
/// the list is empty.
struct LruList<K, V> {
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    most_recent: Option<usize>,
    least_recent: Option<usize>,
}

impl<K: Hash + Eq + Clone, V> LruList<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        let reserved = capacity.min(PREALLOCATE_LIMIT);
        Self {
            index: HashMap::with_capacity(reserved),
            nodes: Vec::with_capacity(reserved),
            most_recent: None,
            least_recent: None,
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    /// Finds `key` and marks it most recently used.
    fn lookup<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.index.get(key)?;
        self.promote(slot);
        Some(&self.nodes[slot].value)
    }

    /// Stores a key that is not yet present. At capacity the least recently
    /// used node is overwritten in place and its old key is returned.
    fn insert(&mut self, key: K, value: V, capacity: usize) -> Option<K> {
        let victim = self.least_recent.filter(|_| self.len() >= capacity);
        match victim {
            Some(slot) => {
                self.unlink(slot);
                let node = &mut self.nodes[slot];
                let old_key = std::mem::replace(&mut node.key, key.clone());
                node.value = value;
                self.index.remove(&old_key);
                self.index.insert(key, slot);
                self.push_front(slot);
                Some(old_key)
            }
            None => {
                let slot = self.nodes.len();
                self.nodes.push(Node {
                    key: key.clone(),
                    value,
                    newer: None,
                    older: None,
                });
                self.index.insert(key, slot);
                self.push_front(slot);
                None
            }
        }
    }

    fn promote(&mut self, slot: usize) {
        if self.most_recent == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    /// Detaches a node, patching its neighbors and the list ends.
    fn unlink(&mut self, slot: usize) {
        let (newer, older) = (self.nodes[slot].newer, self.nodes[slot].older);
        match newer {
            Some(n) => self.nodes[n].older = older,
            None => self.most_recent = older,
        }
        match older {
            Some(o) => self.nodes[o].newer = newer,
            None => self.least_recent = newer,
        }
        let node = &mut self.nodes[slot];
        node.newer = None;
        node.older = None;
    }

    /// Attaches a detached node as most recently used.
    fn push_front(&mut self, slot: usize) {
        let previous_head = self.most_recent;
        self.nodes[slot].older = previous_head;
        self.nodes[slot].newer = None;
        match previous_head {
            Some(head) => self.nodes[head].newer = Some(slot),
            None => self.least_recent = Some(slot),
        }
        self.most_recent = Some(slot);
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    fn keys_by_recency(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.most_recent;
        while let Some(slot) = cursor {
            keys.push(self.nodes[slot].key.clone());
            cursor = self.nodes[slot].older;
        }
        keys
    }
}

/// A bounded, thread-safe LRU cache.
///
/// Holds at most `capacity` entries. A hit moves the entry to the most
/// recently used position; a miss at capacity evicts the least recently used
/// entry and reuses its storage for the new one.
///
/// Values are handed out by clone. Store an `Arc` when callers racing on the
/// same key must observe the very same allocation.
pub struct HashLruCache<K, V> {
    capacity: usize,
    list: Mutex<LruList<K, V>>,
}

impl<K: Hash + Eq + Clone, V> HashLruCache<K, V> {
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            list: Mutex::new(LruList::with_capacity(capacity)),
        })
    }

    /// The maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of resident entries.
    pub fn len(&self) -> usize {
        self.list.lock().len()
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Cache<K, V> for HashLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn try_get<Q, F, E>(&self, key: &Q, loader: F) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: ToOwned<Owned = K> + Hash + Eq + ?Sized,
        F: FnOnce(&Q) -> Result<V, E>,
    {
        let cached = self.list.lock().lookup(key).cloned();
        if let Some(value) = cached {
            trace!("lru cache hit");
            return Ok(value);
        }

        trace!("lru cache miss, loading");
        let value = loader(key)?;

        let mut list = self.list.lock();
        if let Some(existing) = list.lookup(key) {
            debug!("key stored concurrently while loading, discarding computed value");
            return Ok(existing.clone());
        }
        if list.insert(key.to_owned(), value.clone(), self.capacity).is_some() {
            debug!(capacity = self.capacity, "evicted least recently used entry");
        }
        Ok(value)
    }
}

impl<K, V> fmt::Debug for HashLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashLruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.list.lock().index.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recency(cache: &HashLruCache<i32, i32>) -> Vec<i32> {
        cache.list.lock().keys_by_recency()
    }

    fn assert_consistent<K: Hash + Eq + Clone, V>(cache: &HashLruCache<K, V>) {
        let list = cache.list.lock();
        assert!(list.len() <= cache.capacity());
        assert_eq!(list.index.len(), list.nodes.len());
        assert_eq!(list.keys_by_recency().len(), list.len());
        assert_eq!(list.most_recent.is_none(), list.len() == 0);
        assert_eq!(list.least_recent.is_none(), list.len() == 0);
        for (key, &slot) in &list.index {
            assert!(list.nodes[slot].key == *key);
        }
    }

    #[test]
    fn zero_capacity_rejected() {
        let result = HashLruCache::<i32, i32>::new(0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
    }

    #[test]
    fn size_one() {
        let cache: HashLruCache<i32, i32> = HashLruCache::new(1).unwrap();
        assert_eq!(cache.get(&1, |i| i * 2), 2);
        // 1 is cached, not recomputed
        assert_eq!(cache.get(&1, |i| i * 3), 2);

        assert_eq!(cache.get(&2, |i| i * 2), 4);
        // 2 is cached, not recomputed
        assert_eq!(cache.get(&2, |i| i * 4), 4);

        // 1 was evicted, recomputed
        assert_eq!(cache.get(&1, |i| i * 5), 5);
        assert_eq!(cache.len(), 1);
        assert_consistent(&cache);
    }

    #[test]
    fn size_two() {
        let cache: HashLruCache<i32, i32> = HashLruCache::new(2).unwrap();
        assert_eq!(cache.get(&1, |i| i * 2), 2);
        assert_eq!(cache.get(&2, |i| i * 2), 4);
        // 1 is evicted, 3 is added
        assert_eq!(cache.get(&3, |i| i * 2), 6);

        assert_eq!(cache.get(&2, |i| i * 3), 4);
        assert_eq!(cache.get(&3, |i| i * 3), 6);

        // 1 is recomputed, 2 is evicted
        assert_eq!(cache.get(&1, |i| i * 5), 5);
        // 2 is recomputed
        assert_eq!(cache.get(&2, |i| i * 5), 10);
        assert_consistent(&cache);
    }

    #[test]
    fn size_three_promotion() {
        let cache: HashLruCache<i32, i32> = HashLruCache::new(3).unwrap();
        assert_eq!(cache.get(&1, |i| i * 2), 2);
        assert_eq!(cache.get(&2, |i| i * 2), 4);
        assert_eq!(cache.get(&3, |i| i * 2), 6);

        assert_eq!(cache.get(&2, |i| i * 3), 4);
        assert_eq!(recency(&cache), vec![2, 3, 1]);

        // 1 is evicted, 4 is added
        assert_eq!(cache.get(&4, |i| i * 2), 8);
        // 3 is evicted, 5 is added
        assert_eq!(cache.get(&5, |i| i * 2), 10);
        assert_eq!(recency(&cache), vec![5, 4, 2]);

        // 2 survived both evictions
        assert_eq!(cache.get(&2, |i| i * 3), 4);
        assert_consistent(&cache);
    }

    #[test]
    fn promoting_the_tail_moves_the_tail() {
        let cache: HashLruCache<i32, i32> = HashLruCache::new(3).unwrap();
        for key in [1, 2, 3] {
            cache.get(&key, |i| *i);
        }
        cache.get(&1, |_| unreachable!());
        assert_eq!(recency(&cache), vec![1, 3, 2]);
        cache.get(&3, |_| unreachable!());
        assert_eq!(recency(&cache), vec![3, 1, 2]);
        assert_consistent(&cache);
    }

    #[test]
    fn evicted_storage_is_reused() {
        let cache: HashLruCache<i32, i32> = HashLruCache::new(2).unwrap();
        for key in 0..50 {
            cache.get(&key, |i| i + 100);
        }
        let list = cache.list.lock();
        assert_eq!(list.nodes.len(), 2);
        assert_eq!(list.keys_by_recency(), vec![49, 48]);
    }

    #[test]
    fn loader_error_leaves_cache_untouched() {
        let cache: HashLruCache<i32, i32> = HashLruCache::new(2).unwrap();
        cache.get(&1, |i| *i);
        cache.get(&2, |i| *i);

        let result: Result<i32, String> = cache.try_get(&3, |_| Err("no".to_string()));
        assert_eq!(result, Err("no".to_string()));
        assert_eq!(recency(&cache), vec![2, 1]);
        assert_eq!(cache.get(&1, |_| unreachable!()), 1);
        assert_consistent(&cache);
    }

    #[test]
    fn borrowed_string_keys() {
        let cache: HashLruCache<String, usize> = HashLruCache::new(4).unwrap();
        assert_eq!(cache.get("select 1", str::len), 8);
        assert_eq!(cache.get("select 1", |_| 0), 8);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_store_wins_over_loser() {
        let cache: HashLruCache<String, Arc<String>> = HashLruCache::new(2).unwrap();
        let first = Arc::new("first".to_string());

        // the loader itself stores the key, so the outer call loses the race
        let returned = cache.get("k", |key| {
            let winner = cache.get(key, |_| Arc::clone(&first));
            assert!(Arc::ptr_eq(&winner, &first));
            Arc::new("second".to_string())
        });

        assert!(Arc::ptr_eq(&returned, &first));
        assert_eq!(cache.len(), 1);
        let again = cache.get("k", |_| unreachable!());
        assert!(Arc::ptr_eq(&again, &first));
        assert_consistent(&cache);
    }

    #[test]
    fn concurrent_store_is_promoted_on_recheck() {
        let cache: HashLruCache<i32, i32> = HashLruCache::new(3).unwrap();
        let value = cache.get(&1, |_| {
            for key in 1..=3 {
                cache.get(&key, |i| i * 10);
            }
            assert_eq!(recency(&cache), vec![3, 2, 1]);
            99
        });
        assert_eq!(value, 10);
        assert_eq!(recency(&cache), vec![1, 3, 2]);

        cache.get(&4, |i| i * 10);
        assert_eq!(recency(&cache), vec![4, 1, 3]);
        assert_consistent(&cache);
    }

    #[test]
    fn lock_is_released_while_loading() {
        let cache: HashLruCache<i32, i32> = HashLruCache::new(3).unwrap();
        cache.get(&1, |i| i * 10);
        let value = cache.get(&2, |i| {
            // reentrant use would deadlock if the lock were held
            assert_eq!(cache.get(&1, |_| unreachable!()), 10);
            assert_eq!(cache.len(), 1);
            i * 10
        });
        assert_eq!(value, 20);
        assert_eq!(recency(&cache), vec![2, 1]);
    }

    #[test]
    fn debug_shows_capacity_and_len() {
        let cache: HashLruCache<i32, i32> = HashLruCache::new(5).unwrap();
        cache.get(&1, |i| *i);
        let text = format!("{cache:?}");
        assert!(text.contains("capacity: 5"));
        assert!(text.contains("len: 1"));
    }

    #[test]
    fn is_empty_until_first_insert() {
        let cache = HashLruCache::<i32, i32>::new(1).unwrap();
        assert!(cache.is_empty());
        cache.get(&7, |i| *i);
        assert!(!cache.is_empty());
        assert_eq!(cache.capacity(), 1);
    }
}
