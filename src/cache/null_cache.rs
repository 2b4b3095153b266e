/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::cache::Cache;

/// A cache that stores nothing. Every lookup misses, every insertion is
/// discarded. Useful as a no-op strategy baseline.
pub struct NullCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	_marker: PhantomData<K>,
}

impl<K> NullCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new() -> Self {
		NullCache { _marker: PhantomData }
	}
}

impl<K> Default for NullCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K> Cache<K> for NullCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize {
		0
	}

	fn len(&self) -> usize {
		0
	}

	fn has(&self, _key: &K) -> bool {
		false
	}

	fn get(&mut self, _key: &K) -> bool {
		false
	}

	fn put(&mut self, _key: K) -> Option<K> {
		None
	}

	fn remove(&mut self, _key: &K) -> bool {
		false
	}

	fn dump(&self) -> Vec<K> {
		Vec::new()
	}

	fn clear(&mut self) {}
}
