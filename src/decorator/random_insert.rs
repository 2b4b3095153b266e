/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cache::Cache;

/// Inserts into the base cache with probability `p`; otherwise the put is
/// silently dropped. Existing residents of the base cache are untouched.
pub struct RandomInsertCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	inner: Box<dyn Cache<K>>,
	p: f64,
	rng: StdRng,
}

impl<K> RandomInsertCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(inner: Box<dyn Cache<K>>, p: f64) -> Self {
		assert!((0.0..=1.0).contains(&p), "insertion probability must be in [0, 1]");

		RandomInsertCache { inner, p, rng: StdRng::from_entropy() }
	}

	/// Same as [`Self::new`] but draws from a seeded RNG, so repeated
	/// runs with the same seed and operation sequence insert the same
	/// keys.
	#[must_use]
	pub fn with_seed(inner: Box<dyn Cache<K>>, p: f64, seed: u64) -> Self {
		assert!((0.0..=1.0).contains(&p), "insertion probability must be in [0, 1]");

		RandomInsertCache { inner, p, rng: StdRng::seed_from_u64(seed) }
	}
}

impl<K> Cache<K> for RandomInsertCache<K>
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
		if self.rng.gen_bool(self.p) {
			self.inner.put(key)
		} else {
			None
		}
	}

	fn remove(&mut self, key: &K) -> bool {
		self.inner.remove(key)
	}

	fn dump(&self) -> Vec<K> {
		self.inner.dump()
	}

	fn clear(&mut self) {
		self.inner.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::LruCache;

	#[test]
	fn probability_zero_never_inserts() {
		let mut cache = RandomInsertCache::new(Box::new(LruCache::new(4)), 0.0);

		for key in 0..10 {
			cache.put(key);
		}

		assert_eq!(cache.len(), 0);
	}

	#[test]
	fn probability_one_always_inserts() {
		let mut cache = RandomInsertCache::new(Box::new(LruCache::new(4)), 1.0);

		cache.put(1);
		assert!(cache.has(&1));
	}

	#[test]
	fn same_seed_produces_the_same_dump() {
		let run = || {
			let mut cache = RandomInsertCache::with_seed(Box::new(LruCache::new(4)), 0.5, 7);

			for key in 0..20 {
				cache.put(key);
			}

			cache.dump()
		};

		assert_eq!(run(), run());
	}
}
