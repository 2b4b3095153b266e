/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Property-based tests for the universal cache invariants and the
//! `OrderedIndex` ordering invariants, run over random operation
//! sequences against every base eviction policy.

use icn_cache_sim::cache::{
	Cache, ClimbCache, FifoCache, InCacheLfuCache, LruCache, NullCache, PerfectLfuCache,
	RandomEvictionCache, SegmentedLruCache,
};
use icn_cache_sim::OrderedIndex;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
	Put(u32),
	Get(u32),
	Remove(u32),
	Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
	prop_oneof![
		(0u32..8).prop_map(Op::Put),
		(0u32..8).prop_map(Op::Get),
		(0u32..8).prop_map(Op::Remove),
		Just(Op::Clear),
	]
}

/// Runs `ops` against `cache`, checking the universal invariants after
/// every single operation: the size bound, has/dump consistency, and
/// eviction accounting. Panics (failing the proptest) on violation.
fn check_universal_properties(cache: &mut dyn Cache<u32>, capacity: usize, ops: &[Op]) {
	for op in ops {
		match *op {
			Op::Put(key) => {
				let evicted = cache.put(key);

				assert!(cache.len() <= capacity, "bound violated after put");
				assert!(cache.has(&key), "put key must be resident immediately after");

				if let Some(evicted_key) = evicted {
					assert_ne!(evicted_key, key, "a put key cannot evict itself");
					assert!(!cache.has(&evicted_key), "evicted key must not remain resident");
				}
			}
			Op::Get(key) => {
				let had = cache.has(&key);
				let hit = cache.get(&key);
				assert_eq!(had, hit, "get must agree with has");
				assert_eq!(cache.has(&key), had, "get must not change membership");
			}
			Op::Remove(key) => {
				let had = cache.has(&key);
				let removed = cache.remove(&key);
				assert_eq!(had, removed, "remove's return must match prior membership");
				assert!(!cache.has(&key), "key must be gone after remove");
				assert!(!cache.remove(&key), "removing twice must return false the second time");
			}
			Op::Clear => {
				cache.clear();
				assert_eq!(cache.len(), 0, "clear must leave the cache empty");
			}
		}

		assert!(cache.len() <= capacity, "bound violated");

		let dump = cache.dump();
		assert_eq!(dump.len(), cache.len(), "dump length must match len");

		for key in 0u32..8 {
			assert_eq!(cache.has(&key), dump.contains(&key), "has/dump disagreement for {key}");
		}
	}
}

macro_rules! universal_property_test {
	($name:ident, $make:expr) => {
		proptest! {
			#[test]
			fn $name(capacity in 1usize..6, ops in prop::collection::vec(op_strategy(), 0..60)) {
				let mut cache = $make(capacity);
				check_universal_properties(&mut cache, capacity, &ops);
			}
		}
	};
}

universal_property_test!(lru_satisfies_universal_properties, |c| LruCache::new(c));
universal_property_test!(fifo_satisfies_universal_properties, |c| FifoCache::new(c));
universal_property_test!(climb_satisfies_universal_properties, |c| ClimbCache::new(c));
universal_property_test!(in_cache_lfu_satisfies_universal_properties, |c| InCacheLfuCache::new(c));
universal_property_test!(perfect_lfu_satisfies_universal_properties, |c| PerfectLfuCache::new(c));
universal_property_test!(random_eviction_satisfies_universal_properties, |c| RandomEvictionCache::new(c));
universal_property_test!(slru_satisfies_universal_properties, |c| SegmentedLruCache::new(c, 3));

proptest! {
	#[test]
	fn null_cache_never_retains_anything(keys in prop::collection::vec(0u32..8, 0..60)) {
		let mut cache = NullCache::new();

		for key in keys {
			assert_eq!(cache.put(key), None);
			assert!(!cache.has(&key));
			assert!(!cache.get(&key));
			assert!(!cache.remove(&key));
		}

		assert_eq!(cache.len(), 0);
		assert!(cache.dump().is_empty());
	}
}

#[derive(Debug, Clone, Copy)]
enum IndexOp {
	InsertTop(u32),
	InsertBottom(u32),
	MoveToTop(u32),
	MoveToBottom(u32),
	MoveUp(u32),
	MoveDown(u32),
	Remove(u32),
}

fn index_op_strategy() -> impl Strategy<Value = IndexOp> {
	prop_oneof![
		(0u32..10).prop_map(IndexOp::InsertTop),
		(0u32..10).prop_map(IndexOp::InsertBottom),
		(0u32..10).prop_map(IndexOp::MoveToTop),
		(0u32..10).prop_map(IndexOp::MoveToBottom),
		(0u32..10).prop_map(IndexOp::MoveUp),
		(0u32..10).prop_map(IndexOp::MoveDown),
		(0u32..10).prop_map(IndexOp::Remove),
	]
}

proptest! {
	#[test]
	fn ordered_index_iteration_orders_are_mutual_reverses(ops in prop::collection::vec(index_op_strategy(), 0..60)) {
		let mut index: OrderedIndex<u32> = OrderedIndex::new();

		for op in ops {
			match op {
				IndexOp::InsertTop(k) => { let _ = index.insert_top(k); }
				IndexOp::InsertBottom(k) => { let _ = index.insert_bottom(k); }
				IndexOp::MoveToTop(k) => { let _ = index.move_to_top(&k); }
				IndexOp::MoveToBottom(k) => { let _ = index.move_to_bottom(&k); }
				IndexOp::MoveUp(k) => { let _ = index.move_up(&k); }
				IndexOp::MoveDown(k) => { let _ = index.move_down(&k); }
				IndexOp::Remove(k) => { let _ = index.remove(&k); }
			}
		}

		let forward: Vec<u32> = index.iter_top_to_bottom().copied().collect();
		let mut reversed: Vec<u32> = index.iter_bottom_to_top().copied().collect();
		reversed.reverse();

		assert_eq!(forward, reversed);
		assert_eq!(forward.len(), index.len());
	}

	#[test]
	fn move_to_top_then_bottom_is_idempotent(ops in prop::collection::vec(index_op_strategy(), 0..30), key in 0u32..10) {
		let mut index: OrderedIndex<u32> = OrderedIndex::new();

		for op in ops {
			match op {
				IndexOp::InsertTop(k) => { let _ = index.insert_top(k); }
				IndexOp::InsertBottom(k) => { let _ = index.insert_bottom(k); }
				IndexOp::MoveToTop(k) => { let _ = index.move_to_top(&k); }
				IndexOp::MoveToBottom(k) => { let _ = index.move_to_bottom(&k); }
				IndexOp::MoveUp(k) => { let _ = index.move_up(&k); }
				IndexOp::MoveDown(k) => { let _ = index.move_down(&k); }
				IndexOp::Remove(k) => { let _ = index.remove(&k); }
			}
		}

		if index.contains(&key) {
			index.move_to_bottom(&key).unwrap();
			let after_first = index.iter_top_to_bottom().copied().collect::<Vec<_>>();

			index.move_to_bottom(&key).unwrap();
			let after_second = index.iter_top_to_bottom().copied().collect::<Vec<_>>();

			assert_eq!(after_first, after_second);
			assert_eq!(index.bottom(), Some(&key));
		}
	}
}
