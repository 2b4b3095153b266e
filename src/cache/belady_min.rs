/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cache::{Cache, CacheError};

/// Belady's MIN: the provably optimal offline policy. Requires the full
/// future trace up front; each key's upcoming occurrences are queued and
/// consumed one at a time by `get`. On overflow, evicts whichever
/// resident is used again the latest (or never again).
pub struct BeladyMinCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	capacity: usize,
	next_uses: FxHashMap<K, VecDeque<usize>>,
	residents: FxHashSet<K>,
}

impl<K> BeladyMinCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	pub fn new(capacity: usize, trace: impl IntoIterator<Item = K>) -> Result<Self, CacheError> {
		if capacity == 0 {
			return Err(CacheError::ZeroCapacity);
		}

		let mut next_uses: FxHashMap<K, VecDeque<usize>> = FxHashMap::default();

		let mut empty = true;
		for (i, key) in trace.into_iter().enumerate() {
			empty = false;
			next_uses.entry(key).or_default().push_back(i);
		}

		if empty {
			return Err(CacheError::EmptyTrace);
		}

		for queue in next_uses.values_mut() {
			queue.push_back(usize::MAX);
		}

		Ok(BeladyMinCache {
			capacity,
			next_uses,
			residents: FxHashSet::default(),
		})
	}

	fn next_use(&self, key: &K) -> usize {
		self.next_uses
			.get(key)
			.and_then(|queue| queue.front())
			.copied()
			.unwrap_or(usize::MAX)
	}

	fn farthest_resident(&self) -> Option<K> {
		self.residents
			.iter()
			.max_by_key(|key| self.next_use(key))
			.cloned()
	}
}

impl<K> Cache<K> for BeladyMinCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize {
		self.capacity
	}

	fn len(&self) -> usize {
		self.residents.len()
	}

	fn has(&self, key: &K) -> bool {
		self.residents.contains(key)
	}

	fn get(&mut self, key: &K) -> bool {
		if let Some(queue) = self.next_uses.get_mut(key) {
			queue.pop_front();
		}

		self.residents.contains(key)
	}

	fn put(&mut self, key: K) -> Option<K> {
		if self.residents.len() < self.capacity {
			self.residents.insert(key);
			return None;
		}

		let victim = self.farthest_resident().expect("cache is at capacity");

		if self.next_use(&key) < self.next_use(&victim) {
			self.residents.remove(&victim);
			self.residents.insert(key);
			Some(victim)
		} else {
			None
		}
	}

	fn remove(&mut self, key: &K) -> bool {
		self.residents.remove(key)
	}

	fn dump(&self) -> Vec<K> {
		self.residents.iter().cloned().collect()
	}

	fn clear(&mut self) {
		self.residents.clear();
	}
}
