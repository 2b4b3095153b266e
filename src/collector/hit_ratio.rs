/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::collector::{Collector, CollectorResults, MetricValue};
use crate::network::topology::NodeId;

/// Counts per-session hits and misses globally, per cache node that
/// reported a hit, and per origin server that ended up serving a miss.
#[derive(Debug, Default)]
pub struct CacheHitRatioCollector {
	sessions: u64,
	hits: u64,

	node_hits: FxHashMap<NodeId, u64>,
	server_hits: FxHashMap<NodeId, u64>,
}

impl CacheHitRatioCollector {
	#[must_use]
	pub fn new() -> Self {
		CacheHitRatioCollector::default()
	}
}

impl<C> Collector<C> for CacheHitRatioCollector
where
	C: Debug,
{
	fn session_start(&mut self, _time: f64, _receiver: NodeId, _content: &C) {}

	fn request_hop(&mut self, _u: NodeId, _v: NodeId, _main_path: bool) {}

	fn cache_hit(&mut self, v: NodeId) {
		*self.node_hits.entry(v).or_insert(0) += 1;
	}

	fn server_hit(&mut self, v: NodeId) {
		*self.server_hits.entry(v).or_insert(0) += 1;
	}

	fn content_hop(&mut self, _u: NodeId, _v: NodeId, _main_path: bool) {}

	fn session_end(&mut self, _serving_node: Option<NodeId>, hit: bool) {
		self.sessions += 1;

		if hit {
			self.hits += 1;
		}
	}

	fn results(&self) -> CollectorResults {
		let ratio = if self.sessions == 0 { 0.0 } else { self.hits as f64 / self.sessions as f64 };

		let mut results = CollectorResults::default();

		results.insert("RATIO".to_string(), MetricValue::Scalar(ratio));

		results.insert(
			"PER_NODE_CACHE_HITS".to_string(),
			MetricValue::PerNode(self.node_hits.iter().map(|(&k, &v)| (k, v as f64)).collect()),
		);

		results.insert(
			"PER_NODE_SERVER_HITS".to_string(),
			MetricValue::PerNode(self.server_hits.iter().map(|(&k, &v)| (k, v as f64)).collect()),
		);

		results
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ratio_is_zero_with_no_sessions() {
		let collector = CacheHitRatioCollector::new();
		let results: CollectorResults = Collector::<u32>::results(&collector);
		assert_eq!(results["RATIO"], MetricValue::Scalar(0.0));
	}

	#[test]
	fn tracks_global_and_per_node_hits_separately_from_server_hits() {
		let mut collector = CacheHitRatioCollector::new();

		Collector::<u32>::cache_hit(&mut collector, 2);
		Collector::<u32>::session_end(&mut collector, None, true);

		Collector::<u32>::server_hit(&mut collector, 5);
		Collector::<u32>::session_end(&mut collector, Some(5), false);

		let results: CollectorResults = Collector::<u32>::results(&collector);
		assert_eq!(results["RATIO"], MetricValue::Scalar(0.5));

		match &results["PER_NODE_CACHE_HITS"] {
			MetricValue::PerNode(map) => assert_eq!(map[&2], 1.0),
			other => panic!("unexpected variant: {other:?}"),
		}

		match &results["PER_NODE_SERVER_HITS"] {
			MetricValue::PerNode(map) => assert_eq!(map[&5], 1.0),
			other => panic!("unexpected variant: {other:?}"),
		}
	}
}
