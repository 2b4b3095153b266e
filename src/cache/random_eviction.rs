/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rand::Rng;
use rustc_hash::FxHashMap;

/// Uniformly-random eviction on overflow. Positions are kept in a flat
/// slot array so the victim slot can be drawn in O(1) and the vacated
/// slot filled by a swap from the tail.
pub struct RandomEvictionCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	capacity: usize,
	slots: Vec<K>,
	position: FxHashMap<K, usize>,
}

impl<K> RandomEvictionCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		RandomEvictionCache {
			capacity,
			slots: Vec::with_capacity(capacity),
			position: FxHashMap::default(),
		}
	}
}

impl<K> crate::cache::Cache<K> for RandomEvictionCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize {
		self.capacity
	}

	fn len(&self) -> usize {
		self.slots.len()
	}

	fn has(&self, key: &K) -> bool {
		self.position.contains_key(key)
	}

	fn get(&mut self, key: &K) -> bool {
		self.has(key)
	}

	fn put(&mut self, key: K) -> Option<K> {
		if self.has(&key) {
			return None;
		}

		if self.slots.len() == self.capacity {
			let victim_slot = rand::thread_rng().gen_range(0..self.capacity);
			let evicted = std::mem::replace(&mut self.slots[victim_slot], key.clone());
			self.position.remove(&evicted);
			self.position.insert(key, victim_slot);
			return Some(evicted);
		}

		self.position.insert(key.clone(), self.slots.len());
		self.slots.push(key);
		None
	}

	fn remove(&mut self, key: &K) -> bool {
		let Some(slot) = self.position.remove(key) else {
			return false;
		};

		let last = self.slots.len() - 1;
		self.slots.swap(slot, last);
		self.slots.pop();

		if slot != last {
			let moved = self.slots[slot].clone();
			self.position.insert(moved, slot);
		}

		true
	}

	fn dump(&self) -> Vec<K> {
		self.slots.clone()
	}

	fn clear(&mut self) {
		self.slots.clear();
		self.position.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::Cache;

	#[test]
	fn put_never_duplicates_a_resident_key() {
		let mut cache = RandomEvictionCache::new(4);

		cache.put(1);
		assert_eq!(cache.put(1), None);
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn overflow_always_evicts_exactly_one() {
		let mut cache = RandomEvictionCache::new(2);

		cache.put(1);
		cache.put(2);

		let evicted = cache.put(3).expect("cache was full");
		assert!(evicted == 1 || evicted == 2);
		assert_eq!(cache.len(), 2);
		assert!(cache.has(&3));
	}

	#[test]
	fn remove_keeps_the_slot_table_consistent() {
		let mut cache = RandomEvictionCache::new(3);

		cache.put(1);
		cache.put(2);
		cache.put(3);

		assert!(cache.remove(&2));
		assert_eq!(cache.len(), 2);
		assert!(!cache.has(&2));
		assert!(cache.has(&1));
		assert!(cache.has(&3));

		// every remaining key's recorded slot must match its real slot
		for (key, &slot) in &cache.position {
			assert_eq!(&cache.slots[slot], key);
		}
	}
}
