/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::{
	cache::{Cache, CacheError},
	ordered_index::OrderedIndex,
};

/// Defers insertion into the base cache until a key has been `put` `k`
/// times. A bounded `memory` caps how many pending (not-yet-inserted)
/// keys are tracked at once, evicting the oldest pending key's counter
/// on overflow. `k == 1` degenerates to a transparent pass-through.
pub struct InsertAfterKHitsCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	inner: Box<dyn Cache<K>>,
	k: u32,
	memory: Option<usize>,
	hits: FxHashMap<K, u32>,
	pending: OrderedIndex<K>,
}

impl<K> InsertAfterKHitsCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	pub fn new(inner: Box<dyn Cache<K>>, k: u32, memory: Option<usize>) -> Result<Self, CacheError> {
		if k == 0 {
			return Err(CacheError::ZeroHitThreshold);
		}

		Ok(InsertAfterKHitsCache {
			inner,
			k,
			memory,
			hits: FxHashMap::default(),
			pending: OrderedIndex::new(),
		})
	}

	fn forget_pending(&mut self, key: &K) {
		self.hits.remove(key);

		if self.memory.is_some() && self.pending.contains(key) {
			self.pending.remove(key).expect("key just checked present");
		}
	}

	/// Bypasses the hit counter entirely: clears any pending state for
	/// `key` and inserts it into the base cache unconditionally.
	pub fn force_insert(&mut self, key: K) -> Option<K> {
		self.forget_pending(&key);
		self.inner.put(key)
	}
}

impl<K> Cache<K> for InsertAfterKHitsCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize {
		self.inner.capacity()
	}

	fn len(&self) -> usize {
		self.inner.len()
	}

	fn has(&self, key: &K) -> bool {
		self.inner.has(key)
	}

	fn get(&mut self, key: &K) -> bool {
		self.inner.get(key)
	}

	fn put(&mut self, key: K) -> Option<K> {
		let count = {
			let count = self.hits.entry(key.clone()).or_insert(0);
			*count += 1;
			*count
		};

		if count < self.k {
			if self.memory.is_some() && !self.pending.contains(&key) {
				self.pending.insert_top(key.clone()).expect("key just checked absent");

				if self.pending.len() > self.memory.unwrap() {
					if let Some(forgotten) = self.pending.pop_bottom() {
						self.hits.remove(&forgotten);
					}
				}
			}

			return None;
		}

		self.forget_pending(&key);
		self.inner.put(key)
	}

	fn remove(&mut self, key: &K) -> bool {
		self.forget_pending(key);
		self.inner.remove(key)
	}

	fn dump(&self) -> Vec<K> {
		self.inner.dump()
	}

	fn clear(&mut self) {
		self.inner.clear();
		self.hits.clear();
		self.pending.clear();
	}
}
