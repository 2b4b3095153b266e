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

/// Frequency-bucketed LFU. Counters are discarded when a key is evicted
/// or removed. Within a frequency bucket, keys are kept in arrival order
/// so the bottom of the lowest non-empty bucket is the tie-break victim
/// (earliest arrival at that frequency).
pub struct InCacheLfuCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	capacity: usize,
	freq_of: FxHashMap<K, usize>,
	buckets: Vec<OrderedIndex<K>>,
	len: usize,
}

impl<K> InCacheLfuCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		InCacheLfuCache {
			capacity,
			freq_of: FxHashMap::default(),
			buckets: Vec::new(),
			len: 0,
		}
	}

	fn ensure_bucket(&mut self, freq: usize) {
		while self.buckets.len() <= freq {
			self.buckets.push(OrderedIndex::new());
		}
	}

	fn evict_one(&mut self) -> Option<K> {
		for bucket in &mut self.buckets {
			if let Some(key) = bucket.pop_bottom() {
				self.freq_of.remove(&key);
				return Some(key);
			}
		}

		None
	}
}

impl<K> Cache<K> for InCacheLfuCache<K>
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
		self.freq_of.contains_key(key)
	}

	fn get(&mut self, key: &K) -> bool {
		let Some(&freq) = self.freq_of.get(key) else {
			return false;
		};

		self.buckets[freq].remove(key).expect("key tracked at wrong frequency");

		let new_freq = freq + 1;
		self.ensure_bucket(new_freq);
		self.buckets[new_freq].insert_top(key.clone()).expect("fresh bucket slot");
		self.freq_of.insert(key.clone(), new_freq);

		true
	}

	fn put(&mut self, key: K) -> Option<K> {
		if self.freq_of.contains_key(&key) {
			return None;
		}

		self.ensure_bucket(1);
		self.buckets[1].insert_top(key.clone()).expect("key just checked absent");
		self.freq_of.insert(key, 1);
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

	fn remove(&mut self, key: &K) -> bool {
		let Some(freq) = self.freq_of.remove(key) else {
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
		self.freq_of.clear();
		self.buckets.clear();
		self.len = 0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn put_of_existing_key_is_a_no_op() {
		let mut cache = InCacheLfuCache::new(4);

		cache.put(1);
		assert_eq!(cache.put(1), None);
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn eviction_prefers_lowest_frequency_then_earliest_arrival() {
		let mut cache = InCacheLfuCache::new(2);

		cache.put(1);
		cache.put(2);

		cache.get(&1);
		cache.get(&1);
		cache.get(&2);

		// 1 has frequency 3, 2 has frequency 2; 3 should evict 2
		assert_eq!(cache.put(3), Some(2));
		assert!(cache.has(&1));
		assert!(cache.has(&3));
	}

	#[test]
	fn counters_are_discarded_on_eviction() {
		let mut cache = InCacheLfuCache::new(1);

		cache.put(1);
		cache.get(&1);
		cache.get(&1);

		assert_eq!(cache.put(2), Some(1));

		// re-inserting 1 should start fresh at frequency 1, not resume at 3
		cache.put(1);
		assert_eq!(cache.put(3), Some(1));
	}
}
