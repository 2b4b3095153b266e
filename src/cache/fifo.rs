/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use crate::{cache::Cache, ordered_index::OrderedIndex};

/// First-in-first-out eviction. Unlike LRU, a hit never reorders; only
/// insertion order (top = most recently inserted) matters.
pub struct FifoCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	capacity: usize,
	index: OrderedIndex<K>,
}

impl<K> FifoCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		FifoCache {
			capacity,
			index: OrderedIndex::new(),
		}
	}
}

impl<K> Cache<K> for FifoCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize {
		self.capacity
	}

	fn len(&self) -> usize {
		self.index.len()
	}

	fn has(&self, key: &K) -> bool {
		self.index.contains(key)
	}

	fn get(&mut self, key: &K) -> bool {
		self.index.contains(key)
	}

	fn put(&mut self, key: K) -> Option<K> {
		if self.index.contains(&key) {
			return None;
		}

		self.index.insert_top(key).expect("key just checked absent");

		if self.index.len() > self.capacity {
			return self.index.pop_bottom();
		}

		None
	}

	fn remove(&mut self, key: &K) -> bool {
		self.index.remove(key).is_ok()
	}

	fn dump(&self) -> Vec<K> {
		self.index.iter_top_to_bottom().cloned().collect()
	}

	fn clear(&mut self) {
		self.index.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hits_do_not_reorder() {
		let mut cache = FifoCache::new(3);

		cache.put(1);
		cache.put(2);
		cache.put(3);

		assert!(cache.get(&1));
		assert_eq!(cache.dump(), vec![3, 2, 1]);
	}

	#[test]
	fn overflow_evicts_oldest_insertion() {
		let mut cache = FifoCache::new(2);

		cache.put(1);
		cache.put(2);

		assert_eq!(cache.put(3), Some(1));
		assert_eq!(cache.dump(), vec![3, 2]);
	}
}
