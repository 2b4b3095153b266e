/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::{cache::Cache, ordered_index::OrderedIndex};

/// LFU with perfect knowledge: frequency counters persist for every key
/// ever seen, even after eviction, but only resident keys are tracked for
/// eviction purposes. `get` always bumps the counter (creating one on a
/// first sight), independent of residency.
pub struct PerfectLfuCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	capacity: usize,
	counter: FxHashMap<K, usize>,
	resident_freq: FxHashMap<K, usize>,
	buckets: Vec<OrderedIndex<K>>,
	len: usize,
}

impl<K> PerfectLfuCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		PerfectLfuCache {
			capacity,
			counter: FxHashMap::default(),
			resident_freq: FxHashMap::default(),
			buckets: Vec::new(),
			len: 0,
		}
	}

	fn ensure_bucket(&mut self, freq: usize) {
		while self.buckets.len() <= freq {
			self.buckets.push(OrderedIndex::new());
		}
	}

	fn bump_counter(&mut self, key: &K) -> usize {
		let freq = self.counter.entry(key.clone()).or_insert(0);
		*freq += 1;
		*freq
	}

	fn evict_one(&mut self) -> Option<K> {
		for bucket in &mut self.buckets {
			if let Some(key) = bucket.pop_bottom() {
				self.resident_freq.remove(&key);
				return Some(key);
			}
		}

		None
	}
}

impl<K> Cache<K> for PerfectLfuCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize {
		self.capacity
	}

	fn len(&self) -> usize {
		self.len
	}

	fn has(&self, key: &K) -> bool {
		self.resident_freq.contains_key(key)
	}

	fn get(&mut self, key: &K) -> bool {
		let new_freq = self.bump_counter(key);

		if let Some(&old_freq) = self.resident_freq.get(key) {
			self.buckets[old_freq].remove(key).expect("key tracked at wrong frequency");
			self.ensure_bucket(new_freq);
			self.buckets[new_freq].insert_top(key.clone()).expect("fresh bucket slot");
			self.resident_freq.insert(key.clone(), new_freq);
		}

		self.has(key)
	}

	fn put(&mut self, key: K) -> Option<K> {
		if self.resident_freq.contains_key(&key) {
			return None;
		}

		let freq = self.bump_counter(&key);

		self.ensure_bucket(freq);
		self.buckets[freq].insert_top(key.clone()).expect("key just checked non-resident");
		self.resident_freq.insert(key, freq);
		self.len += 1;

		if self.len > self.capacity {
			let evicted = self.evict_one();
			if evicted.is_some() {
				self.len -= 1;
			}
			return evicted;
		}

		None
	}

	/// Removes `key` from the resident set only; its counter entry in the
	/// perfect-frequency map is preserved.
	fn remove(&mut self, key: &K) -> bool {
		let Some(freq) = self.resident_freq.remove(key) else {
			return false;
		};

		self.buckets[freq].remove(key).expect("key tracked at wrong frequency");
		self.len -= 1;

		true
	}

	fn dump(&self) -> Vec<K> {
		self.buckets
			.iter()
			.rev()
			.flat_map(|bucket| bucket.iter_top_to_bottom().cloned())
			.collect()
	}

	fn clear(&mut self) {
		self.counter.clear();
		self.resident_freq.clear();
		self.buckets.clear();
		self.len = 0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn get_bumps_counter_even_when_absent() {
		let mut cache: PerfectLfuCache<u32> = PerfectLfuCache::new(4);

		assert!(!cache.get(&1));
		assert_eq!(cache.counter.get(&1), Some(&1));
	}

	#[test]
	fn put_of_existing_resident_is_a_no_op() {
		let mut cache = PerfectLfuCache::new(4);

		cache.put(1);
		assert_eq!(cache.put(1), None);
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn remove_preserves_the_counter_entry() {
		let mut cache = PerfectLfuCache::new(4);

		cache.put(1);
		cache.get(&1);
		cache.get(&1);

		assert!(cache.remove(&1));
		assert!(!cache.has(&1));
		assert_eq!(cache.counter.get(&1), Some(&3));
	}

	#[test]
	fn eviction_uses_the_perfect_counter_across_residency_gaps() {
		let mut cache = PerfectLfuCache::new(2);

		cache.put(1);
		cache.get(&1);
		cache.get(&1);
		cache.remove(&1);

		cache.put(2);
		cache.put(1);

		// 1's counter (3) outranks 2's counter (1); 3 should evict 2
		assert_eq!(cache.put(3), Some(2));
		assert!(cache.has(&1));
	}
}
