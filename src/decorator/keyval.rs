/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::cache::{Cache, CacheError};

/// Pairs a base (key-only) cache with a key→value map kept in lockstep
/// with its membership. The value-carrying methods below change
/// signature relative to [`Cache`], so this type does not implement that
/// trait directly.
pub struct KeyValCache<K, V>
where
	K: Eq + Hash + Clone + Debug,
{
	inner: Box<dyn Cache<K>>,
	values: FxHashMap<K, V>,
}

impl<K, V> KeyValCache<K, V>
where
	K: Eq + Hash + Clone + Debug,
{
	pub fn new(inner: Box<dyn Cache<K>>) -> Result<Self, CacheError> {
		if !inner.is_empty() {
			return Err(CacheError::NonEmptyTtlBase);
		}

		Ok(KeyValCache { inner, values: FxHashMap::default() })
	}

	#[must_use]
	pub fn capacity(&self) -> usize {
		self.inner.capacity()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	#[must_use]
	pub fn has(&self, key: &K) -> bool {
		self.inner.has(key)
	}

	/// Current value of `key` without affecting cache state.
	#[must_use]
	pub fn value(&self, key: &K) -> Option<&V> {
		self.values.get(key)
	}

	pub fn get(&mut self, key: &K) -> Option<&V> {
		if self.inner.get(key) {
			self.values.get(key)
		} else {
			None
		}
	}

	pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
		let evicted = self.inner.put(key.clone());
		self.values.insert(key, value);

		evicted.map(|evicted_key| {
			let evicted_value = self.values.remove(&evicted_key).expect("evicted key had a value");
			(evicted_key, evicted_value)
		})
	}

	pub fn remove(&mut self, key: &K) -> Option<V> {
		if self.inner.remove(key) {
			self.values.remove(key)
		} else {
			None
		}
	}

	#[must_use]
	pub fn dump(&self) -> Vec<(K, &V)> {
		self.inner
			.dump()
			.into_iter()
			.map(|key| {
				let value = self.values.get(&key).expect("dumped key has a value");
				(key, value)
			})
			.collect()
	}

	pub fn clear(&mut self) {
		self.inner.clear();
		self.values.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::LruCache;

	#[test]
	fn rejects_a_non_empty_base_cache() {
		let mut base = LruCache::new(2);
		base.put(1);

		assert_eq!(
			KeyValCache::<_, u32>::new(Box::new(base)).unwrap_err(),
			CacheError::NonEmptyTtlBase,
		);
	}

	#[test]
	fn value_domain_tracks_membership() {
		let mut cache = KeyValCache::new(Box::new(LruCache::new(1))).unwrap();

		cache.put(1, "a");
		assert_eq!(cache.get(&1), Some(&"a"));

		let evicted = cache.put(2, "b");
		assert_eq!(evicted, Some((1, "a")));
		assert_eq!(cache.get(&1), None);
		assert_eq!(cache.get(&2), Some(&"b"));
	}

	#[test]
	fn remove_drops_the_value_too() {
		let mut cache = KeyValCache::new(Box::new(LruCache::new(2))).unwrap();

		cache.put(1, "a");
		assert_eq!(cache.remove(&1), Some("a"));
		assert_eq!(cache.remove(&1), None);
	}
}
