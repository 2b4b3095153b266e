/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use crate::{cache::Cache, ordered_index::OrderedIndex};

/// CLIMB: a hit moves its key exactly one position toward the top; a
/// no-op at the top. Insertion of a new key always lands at the bottom,
/// regardless of whether the cache is full yet, and only climbs on
/// subsequent hits.
pub struct ClimbCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	capacity: usize,
	index: OrderedIndex<K>,
}

impl<K> ClimbCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		ClimbCache {
			capacity,
			index: OrderedIndex::new(),
		}
	}

	/// Current position of `key`, 0 at the top. `None` if absent.
	#[must_use]
	pub fn position(&self, key: &K) -> Option<usize> {
		self.index.position(key)
	}
}

impl<K> Cache<K> for ClimbCache<K>
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

		self.index.move_up(key).expect("key just checked present");
		true
	}

	fn put(&mut self, key: K) -> Option<K> {
		if self.index.contains(&key) {
			self.index.move_up(&key).expect("key just checked present");
			return None;
		}

		let evicted = if self.index.len() == self.capacity {
			self.index.pop_bottom()
		} else {
			None
		};

		self.index.insert_bottom(key).expect("key just checked absent");
		evicted
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
