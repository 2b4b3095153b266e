/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::cache::{Cache, CacheError};

/// An array of independent sub-caches, one of which is selected at random
/// (uniformly, or per explicit weights) to answer each `get`. Read-through
/// only: `put` must be preceded by a `get` of the same key, which is what
/// selects the sub-cache `put` writes into.
pub struct ArrayCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	caches: Vec<Box<dyn Cache<K>>>,
	weights: Option<Vec<f64>>,
	selected: Option<usize>,
}

impl<K> ArrayCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	pub fn new(caches: Vec<Box<dyn Cache<K>>>) -> Self {
		ArrayCache {
			caches,
			weights: None,
			selected: None,
		}
	}

	pub fn with_weights(
		caches: Vec<Box<dyn Cache<K>>>,
		weights: Vec<f64>,
	) -> Result<Self, CacheError> {
		if weights.len() != caches.len() {
			return Err(CacheError::WeightsLengthMismatch);
		}

		let total: f64 = weights.iter().sum();
		if (total - 1.0).abs() > 0.0001 {
			return Err(CacheError::WeightsNotNormalized);
		}

		Ok(ArrayCache {
			caches,
			weights: Some(weights),
			selected: None,
		})
	}

	fn select_cache(&self) -> usize {
		let mut rng = rand::thread_rng();

		match &self.weights {
			Some(weights) => {
				let dist = WeightedIndex::new(weights).expect("weights validated at construction");
				dist.sample(&mut rng)
			}
			None => rng.gen_range(0..self.caches.len()),
		}
	}
}

impl<K> Cache<K> for ArrayCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize {
		self.caches.iter().map(|cache| cache.capacity()).sum()
	}

	fn len(&self) -> usize {
		self.caches.iter().map(|cache| cache.len()).sum()
	}

	fn has(&self, key: &K) -> bool {
		self.caches.iter().any(|cache| cache.has(key))
	}

	fn get(&mut self, key: &K) -> bool {
		let idx = self.select_cache();
		self.selected = Some(idx);
		self.caches[idx].get(key)
	}

	fn put(&mut self, key: K) -> Option<K> {
		let idx = self.selected.expect("array cache put must be preceded by get");
		self.caches[idx].put(key)
	}

	fn remove(&mut self, key: &K) -> bool {
		let mut removed = false;

		for cache in &mut self.caches {
			removed |= cache.remove(key);
		}

		removed
	}

	fn dump(&self) -> Vec<K> {
		self.caches.iter().flat_map(|cache| cache.dump()).collect()
	}

	fn clear(&mut self) {
		for cache in &mut self.caches {
			cache.clear();
		}

		self.selected = None;
	}
}
