/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use crate::{cache::Cache, ordered_index::OrderedIndex};

/// Least-recently-used eviction: top = most recently referenced.
pub struct LruCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	capacity: usize,
	index: OrderedIndex<K>,
}

impl<K> LruCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		LruCache {
			capacity,
			index: OrderedIndex::new(),
		}
	}
}

impl<K> Cache<K> for LruCache<K>
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
		if !self.index.contains(key) {
			return false;
		}

		self.index.move_to_top(key).expect("key just checked present");
		true
	}

	fn put(&mut self, key: K) -> Option<K> {
		if self.index.contains(&key) {
			self.index.move_to_top(&key).expect("key just checked present");
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
	fn scenario_s1_lru_capacity_4() {
		let mut cache = LruCache::new(4);

		for key in [0, 2, 3, 4, 5] {
			cache.put(key);
		}

		assert_eq!(cache.dump(), vec![5, 4, 3, 2]);

		cache.get(&2);
		assert_eq!(cache.dump(), vec![2, 5, 4, 3]);

		cache.get(&4);
		assert_eq!(cache.dump(), vec![4, 2, 5, 3]);

		cache.clear();
		assert_eq!(cache.dump(), Vec::<u32>::new());
	}

	#[test]
	fn put_of_existing_key_moves_to_top_without_eviction() {
		let mut cache = LruCache::new(2);

		cache.put(1);
		cache.put(2);

		assert_eq!(cache.put(1), None);
		assert_eq!(cache.dump(), vec![1, 2]);
	}

	#[test]
	fn overflow_evicts_the_bottom() {
		let mut cache = LruCache::new(2);

		cache.put(1);
		cache.put(2);

		assert_eq!(cache.put(3), Some(1));
		assert_eq!(cache.dump(), vec![3, 2]);
	}
}
