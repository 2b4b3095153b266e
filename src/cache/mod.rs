/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod lru;
mod slru;
mod in_cache_lfu;
mod perfect_lfu;
mod fifo;
mod climb;
mod random_eviction;
mod belady_min;
mod null_cache;
mod array_cache;

pub use crate::cache::{
	lru::LruCache,
	slru::SegmentedLruCache,
	in_cache_lfu::InCacheLfuCache,
	perfect_lfu::PerfectLfuCache,
	fifo::FifoCache,
	climb::ClimbCache,
	random_eviction::RandomEvictionCache,
	belady_min::BeladyMinCache,
	null_cache::NullCache,
	array_cache::ArrayCache,
};

use std::hash::Hash;
use std::fmt::Debug;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
	#[error("cache capacity must be at least 1")]
	ZeroCapacity,

	#[error("belady-min cache requires a non-empty future trace")]
	EmptyTrace,

	#[error("a ttl decorator must wrap an empty base cache")]
	NonEmptyTtlBase,

	#[error("cannot supply both a ttl and an explicit expiry")]
	BothTtlAndExpiry,

	#[error("insert-after-k-hits decorator requires k >= 1")]
	ZeroHitThreshold,

	#[error("array cache weights must sum to 1")]
	WeightsNotNormalized,

	#[error("array cache weights length must match the number of caches")]
	WeightsLengthMismatch,
}

/// The uniform interface every eviction policy and decorator satisfies.
///
/// `has` never changes state; `get` may reorder per the policy but never
/// changes membership; `put` may evict at most one resident.
pub trait Cache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize;
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn has(&self, key: &K) -> bool;
	fn get(&mut self, key: &K) -> bool;
	fn put(&mut self, key: K) -> Option<K>;
	fn remove(&mut self, key: &K) -> bool;

	/// Snapshot of resident keys in policy order (top/most-favoured first).
	fn dump(&self) -> Vec<K>;

	fn clear(&mut self);
}

/// Tagged-variant dispatch over the nine base eviction policies, so a
/// network node can hold one concrete cache type without trait objects
/// when no decorator is needed. Decorators themselves take `Box<dyn Cache<K>>`
/// so they can wrap either a bare policy or another decorator.
pub enum CachePolicy<K>
where
	K: Eq + Hash + Clone + Debug,
{
	Lru(LruCache<K>),
	Slru(SegmentedLruCache<K>),
	InCacheLfu(InCacheLfuCache<K>),
	PerfectLfu(PerfectLfuCache<K>),
	Fifo(FifoCache<K>),
	Climb(ClimbCache<K>),
	RandomEviction(RandomEvictionCache<K>),
	BeladyMin(BeladyMinCache<K>),
	Null(NullCache<K>),
}

impl<K> Cache<K> for CachePolicy<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize {
		match self {
			CachePolicy::Lru(c) => c.capacity(),
			CachePolicy::Slru(c) => c.capacity(),
			CachePolicy::InCacheLfu(c) => c.capacity(),
			CachePolicy::PerfectLfu(c) => c.capacity(),
			CachePolicy::Fifo(c) => c.capacity(),
			CachePolicy::Climb(c) => c.capacity(),
			CachePolicy::RandomEviction(c) => c.capacity(),
			CachePolicy::BeladyMin(c) => c.capacity(),
			CachePolicy::Null(c) => c.capacity(),
		}
	}

	fn len(&self) -> usize {
		match self {
			CachePolicy::Lru(c) => c.len(),
			CachePolicy::Slru(c) => c.len(),
			CachePolicy::InCacheLfu(c) => c.len(),
			CachePolicy::PerfectLfu(c) => c.len(),
			CachePolicy::Fifo(c) => c.len(),
			CachePolicy::Climb(c) => c.len(),
			CachePolicy::RandomEviction(c) => c.len(),
			CachePolicy::BeladyMin(c) => c.len(),
			CachePolicy::Null(c) => c.len(),
		}
	}

	fn has(&self, key: &K) -> bool {
		match self {
			CachePolicy::Lru(c) => c.has(key),
			CachePolicy::Slru(c) => c.has(key),
			CachePolicy::InCacheLfu(c) => c.has(key),
			CachePolicy::PerfectLfu(c) => c.has(key),
			CachePolicy::Fifo(c) => c.has(key),
			CachePolicy::Climb(c) => c.has(key),
			CachePolicy::RandomEviction(c) => c.has(key),
			CachePolicy::BeladyMin(c) => c.has(key),
			CachePolicy::Null(c) => c.has(key),
		}
	}

	fn get(&mut self, key: &K) -> bool {
		match self {
			CachePolicy::Lru(c) => c.get(key),
			CachePolicy::Slru(c) => c.get(key),
			CachePolicy::InCacheLfu(c) => c.get(key),
			CachePolicy::PerfectLfu(c) => c.get(key),
			CachePolicy::Fifo(c) => c.get(key),
			CachePolicy::Climb(c) => c.get(key),
			CachePolicy::RandomEviction(c) => c.get(key),
			CachePolicy::BeladyMin(c) => c.get(key),
			CachePolicy::Null(c) => c.get(key),
		}
	}

	fn put(&mut self, key: K) -> Option<K> {
		match self {
			CachePolicy::Lru(c) => c.put(key),
			CachePolicy::Slru(c) => c.put(key),
			CachePolicy::InCacheLfu(c) => c.put(key),
			CachePolicy::PerfectLfu(c) => c.put(key),
			CachePolicy::Fifo(c) => c.put(key),
			CachePolicy::Climb(c) => c.put(key),
			CachePolicy::RandomEviction(c) => c.put(key),
			CachePolicy::BeladyMin(c) => c.put(key),
			CachePolicy::Null(c) => c.put(key),
		}
	}

	fn remove(&mut self, key: &K) -> bool {
		match self {
			CachePolicy::Lru(c) => c.remove(key),
			CachePolicy::Slru(c) => c.remove(key),
			CachePolicy::InCacheLfu(c) => c.remove(key),
			CachePolicy::PerfectLfu(c) => c.remove(key),
			CachePolicy::Fifo(c) => c.remove(key),
			CachePolicy::Climb(c) => c.remove(key),
			CachePolicy::RandomEviction(c) => c.remove(key),
			CachePolicy::BeladyMin(c) => c.remove(key),
			CachePolicy::Null(c) => c.remove(key),
		}
	}

	fn dump(&self) -> Vec<K> {
		match self {
			CachePolicy::Lru(c) => c.dump(),
			CachePolicy::Slru(c) => c.dump(),
			CachePolicy::InCacheLfu(c) => c.dump(),
			CachePolicy::PerfectLfu(c) => c.dump(),
			CachePolicy::Fifo(c) => c.dump(),
			CachePolicy::Climb(c) => c.dump(),
			CachePolicy::RandomEviction(c) => c.dump(),
			CachePolicy::BeladyMin(c) => c.dump(),
			CachePolicy::Null(c) => c.dump(),
		}
	}

	fn clear(&mut self) {
		match self {
			CachePolicy::Lru(c) => c.clear(),
			CachePolicy::Slru(c) => c.clear(),
			CachePolicy::InCacheLfu(c) => c.clear(),
			CachePolicy::PerfectLfu(c) => c.clear(),
			CachePolicy::Fifo(c) => c.clear(),
			CachePolicy::Climb(c) => c.clear(),
			CachePolicy::RandomEviction(c) => c.clear(),
			CachePolicy::BeladyMin(c) => c.clear(),
			CachePolicy::Null(c) => c.clear(),
		}
	}
}
