/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::cache::{Cache, CacheError};

/// Labels each resident with an expiration time against a caller-supplied
/// logical clock and purges expired entries lazily, on `has`/`get`/`put`.
/// The side index is an ascending `BTreeMap` keyed by expiry, so the next
/// entry to expire is found in O(log n) rather than by linear scan.
pub struct TtlCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	inner: Box<dyn Cache<K>>,
	time_source: Box<dyn Fn() -> f64>,
	expiry: FxHashMap<K, f64>,
	by_expiry: BTreeMap<OrderedFloat<f64>, Vec<K>>,
}

impl<K> TtlCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	pub fn new(
		inner: Box<dyn Cache<K>>,
		time_source: Box<dyn Fn() -> f64>,
	) -> Result<Self, CacheError> {
		if !inner.is_empty() {
			return Err(CacheError::NonEmptyTtlBase);
		}

		Ok(TtlCache {
			inner,
			time_source,
			expiry: FxHashMap::default(),
			by_expiry: BTreeMap::new(),
		})
	}

	fn now(&self) -> f64 {
		(self.time_source)()
	}

	fn drop_expiry_entry(&mut self, key: &K) {
		if let Some(expires) = self.expiry.remove(key) {
			let bucket_key = OrderedFloat(expires);

			if let Some(bucket) = self.by_expiry.get_mut(&bucket_key) {
				bucket.retain(|k| k != key);

				if bucket.is_empty() {
					self.by_expiry.remove(&bucket_key);
				}
			}
		}
	}

	/// Removes every resident whose expiry is strictly before `cutoff`.
	pub fn purge_till(&mut self, cutoff: f64) {
		loop {
			let Some((&bucket_key, _)) = self.by_expiry.iter().next() else {
				break;
			};

			if bucket_key.into_inner() >= cutoff {
				break;
			}

			let bucket = self.by_expiry.remove(&bucket_key).expect("just peeked");

			for key in bucket {
				self.expiry.remove(&key);
				self.inner.remove(&key);
			}
		}
	}

	/// Removes every expired resident as of the current time.
	pub fn purge(&mut self) {
		let now = self.now();
		self.purge_till(now);
	}

	/// Full `put`, taking an optional relative TTL or absolute expiry.
	/// Supplying both is an error; supplying neither means infinite TTL.
	pub fn put_with_expiry(
		&mut self,
		key: K,
		ttl: Option<f64>,
		expires: Option<f64>,
	) -> Result<Option<K>, CacheError> {
		if ttl.is_some() && expires.is_some() {
			return Err(CacheError::BothTtlAndExpiry);
		}

		let now = self.now();

		let expires = match (ttl, expires) {
			(Some(ttl), None) => {
				if ttl <= 0.0 {
					return Ok(None);
				}
				now + ttl
			}
			(None, Some(expires)) => {
				if expires <= now {
					return Ok(None);
				}
				expires
			}
			(None, None) => f64::INFINITY,
			(Some(_), Some(_)) => unreachable!(),
		};

		if self.inner.len() == self.inner.capacity() {
			self.purge_till(now);
		}

		let evicted = self.inner.put(key.clone());

		if let Some(evicted_key) = &evicted {
			self.drop_expiry_entry(evicted_key);
		}

		let should_update = self.expiry.get(&key).map_or(true, |&old| old < expires);

		if should_update {
			self.drop_expiry_entry(&key);
			self.expiry.insert(key.clone(), expires);
			self.by_expiry.entry(OrderedFloat(expires)).or_default().push(key);
		}

		Ok(evicted)
	}
}

impl<K> Cache<K> for TtlCache<K>
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
		match self.expiry.get(key) {
			Some(&expires) => self.inner.has(key) && self.now() <= expires,
			None => false,
		}
	}

	fn get(&mut self, key: &K) -> bool {
		if !self.inner.get(key) {
			return false;
		}

		let now = self.now();

		match self.expiry.get(key) {
			Some(&expires) if now >= expires => {
				self.inner.remove(key);
				self.drop_expiry_entry(key);
				false
			}
			_ => true,
		}
	}

	fn put(&mut self, key: K) -> Option<K> {
		self.put_with_expiry(key, None, None).expect("no ttl/expiry conflict possible here")
	}

	fn remove(&mut self, key: &K) -> bool {
		if !self.inner.remove(key) {
			return false;
		}

		self.drop_expiry_entry(key);
		true
	}

	fn dump(&self) -> Vec<K> {
		self.inner.dump()
	}

	fn clear(&mut self) {
		self.inner.clear();
		self.expiry.clear();
		self.by_expiry.clear();
	}
}
