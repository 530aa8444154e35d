//! Lock-sharded accumulator used while ranking in parallel.
//!
//! Keys are routed to one of a fixed number of independently locked maps, so
//! tasks working on different documents rarely contend. Merging consumes the
//! accumulator, which means every writer has finished by the time it runs.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};

pub struct ShardedMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: Ord + Hash, V: Default> ShardedMap<K, V> {
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    #[cfg(test)]
    pub fn shard_count(&self) -> usize { self.shards.len() }

    fn shard_for(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() % self.shards.len() as u64) as usize]
    }

    /// Lock the owning shard and return its value for `key`, inserting the
    /// default first. The shard stays locked until the guard drops.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V> {
        let guard = self.shard_for(&key).lock();
        MutexGuard::map(guard, |shard| shard.entry(key).or_default())
    }

    pub fn erase(&self, key: &K) {
        self.shard_for(key).lock().remove(key);
    }

    /// Drain every shard into one ordered map.
    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        let mut merged = BTreeMap::new();
        for shard in self.shards {
            merged.extend(shard.into_inner());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn access_defaults_and_accumulates() {
        let map: ShardedMap<i32, f64> = ShardedMap::new(4);
        *map.access(3) += 1.5;
        *map.access(3) += 1.0;
        *map.access(-7) += 0.5;
        map.erase(&-7);
        map.erase(&100);
        let merged = map.into_ordinary_map();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[&3], 2.5);
    }

    #[test]
    fn zero_shards_is_clamped() {
        let map: ShardedMap<i32, u32> = ShardedMap::new(0);
        assert_eq!(map.shard_count(), 1);
    }

    #[test]
    fn concurrent_writers_do_not_lose_updates() {
        let map: ShardedMap<i32, u64> = ShardedMap::new(8);
        (0..10_000).into_par_iter().for_each(|i| {
            *map.access(i % 97) += 1;
        });
        let merged = map.into_ordinary_map();
        assert_eq!(merged.len(), 97);
        assert_eq!(merged.values().sum::<u64>(), 10_000);
        assert!(merged.keys().zip(merged.keys().skip(1)).all(|(a, b)| a < b));
    }
}
