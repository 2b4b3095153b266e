/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use crate::{cache::Cache, ordered_index::OrderedIndex};

/// Segmented LRU: `S` LRU segments, segment 0 protected (top), segment
/// `S-1` probationary (bottom). A hit promotes one segment toward
/// protected; overflow in the promoted-to segment demotes its bottom.
pub struct SegmentedLruCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	capacities: Vec<usize>,
	segments: Vec<OrderedIndex<K>>,
}

impl<K> SegmentedLruCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	/// Apportions `capacity` across `num_segments` as evenly as possible;
	/// the largest remainders (the earliest, most-protected segments)
	/// receive the +1.
	#[must_use]
	pub fn new(capacity: usize, num_segments: usize) -> Self {
		assert!(num_segments >= 1, "segmented LRU requires at least one segment");

		let base = capacity / num_segments;
		let remainder = capacity % num_segments;

		let capacities = (0..num_segments)
			.map(|i| if i < remainder { base + 1 } else { base })
			.collect();

		Self::with_capacities(capacities)
	}

	/// Explicit per-segment capacities, segment 0 first (protected).
	#[must_use]
	pub fn with_capacities(capacities: Vec<usize>) -> Self {
		let segments = capacities.iter().map(|_| OrderedIndex::new()).collect();

		SegmentedLruCache { capacities, segments }
	}

	/// Explicit allocation as fractions of `capacity` summing to 1.
	#[must_use]
	pub fn with_allocation(capacity: usize, fractions: &[f64]) -> Self {
		let n = fractions.len();
		let mut capacities: Vec<usize> = fractions
			.iter()
			.map(|f| (f * capacity as f64).floor() as usize)
			.collect();

		let allocated: usize = capacities.iter().sum();
		let mut remaining = capacity.saturating_sub(allocated);
		let mut i = 0;

		while remaining > 0 && n > 0 {
			capacities[i % n] += 1;
			remaining -= 1;
			i += 1;
		}

		Self::with_capacities(capacities)
	}

	fn segment_of(&self, key: &K) -> Option<usize> {
		self.segments.iter().position(|segment| segment.contains(key))
	}

	fn promote(&mut self, seg_idx: usize, key: &K) {
		if seg_idx == 0 {
			self.segments[0].move_to_top(key).expect("key just located");
			return;
		}

		self.segments[seg_idx].remove(key).expect("key just located");
		self.segments[seg_idx - 1]
			.insert_top(key.clone())
			.expect("promotion target cannot already hold key");

		if self.segments[seg_idx - 1].len() > self.capacities[seg_idx - 1] {
			if let Some(demoted) = self.segments[seg_idx - 1].pop_bottom() {
				self.segments[seg_idx]
					.insert_top(demoted)
					.expect("demotion target cannot already hold key");
			}
		}
	}

	/// Diagnostic snapshot: one key list per segment, top to bottom,
	/// segment 0 (protected) first.
	#[must_use]
	pub fn dump_by_segment(&self) -> Vec<Vec<K>> {
		self.segments
			.iter()
			.map(|segment| segment.iter_top_to_bottom().cloned().collect())
			.collect()
	}
}

impl<K> Cache<K> for SegmentedLruCache<K>
where
	K: Eq + Hash + Clone + Debug,
{
	fn capacity(&self) -> usize {
		self.capacities.iter().sum()
	}

	fn len(&self) -> usize {
		self.segments.iter().map(OrderedIndex::len).sum()
	}

	fn has(&self, key: &K) -> bool {
		self.segment_of(key).is_some()
	}

	fn get(&mut self, key: &K) -> bool {
		match self.segment_of(key) {
			Some(seg_idx) => {
				self.promote(seg_idx, key);
				true
			}
			None => false,
		}
	}

	fn put(&mut self, key: K) -> Option<K> {
		if let Some(seg_idx) = self.segment_of(&key) {
			self.promote(seg_idx, &key);
			return None;
		}

		let last = self.segments.len() - 1;
		self.segments[last].insert_top(key).expect("key just checked absent");

		if self.segments[last].len() > self.capacities[last] {
			return self.segments[last].pop_bottom();
		}

		None
	}

	fn remove(&mut self, key: &K) -> bool {
		match self.segment_of(key) {
			Some(seg_idx) => self.segments[seg_idx].remove(key).is_ok(),
			None => false,
		}
	}

	fn dump(&self) -> Vec<K> {
		self.segments
			.iter()
			.flat_map(|segment| segment.iter_top_to_bottom().cloned())
			.collect()
	}

	fn clear(&mut self) {
		for segment in &mut self.segments {
			segment.clear();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scenario_s2_slru_capacity_9_three_segments() {
		let mut cache = SegmentedLruCache::new(9, 3);

		cache.put(1);
		cache.put(2);
		cache.put(3);

		assert_eq!(
			cache.dump_by_segment(),
			vec![vec![], vec![], vec![3, 2, 1]],
		);

		cache.get(&2);

		assert_eq!(
			cache.dump_by_segment(),
			vec![vec![], vec![2], vec![3, 1]],
		);

		cache.get(&2);

		assert_eq!(
			cache.dump_by_segment(),
			vec![vec![2], vec![], vec![3, 1]],
		);

		cache.put(4);

		let evicted = cache.put(5);

		assert_eq!(evicted, Some(1));
		assert_eq!(
			cache.dump_by_segment(),
			vec![vec![2], vec![], vec![5, 4, 3]],
		);
	}

	#[test]
	fn apportionment_gives_earlier_segments_the_remainder() {
		let cache: SegmentedLruCache<u32> = SegmentedLruCache::new(10, 3);
		assert_eq!(cache.capacities, vec![4, 3, 3]);
	}
}
