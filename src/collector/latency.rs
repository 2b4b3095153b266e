/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::collector::{Collector, CollectorResults, MetricValue};
use crate::network::topology::{NodeId, Topology};

/// Accumulates the sum of link delays for main-path hops within each
/// session, then reports the mean over all closed sessions.
#[derive(Debug)]
pub struct LatencyCollector {
	delay: FxHashMap<(NodeId, NodeId), f64>,
	main_path_only: bool,

	current: f64,
	total: f64,
	sessions: u64,
}

impl LatencyCollector {
	#[must_use]
	pub fn new<C>(topology: &Topology<C>) -> Self {
		LatencyCollector::with_main_path_only(topology, true)
	}

	#[must_use]
	pub fn with_main_path_only<C>(topology: &Topology<C>, main_path_only: bool) -> Self {
		let mut delay = FxHashMap::default();

		for u in topology.nodes() {
			for &v in topology.neighbors(u) {
				if let Some(d) = topology.delay(u, v) {
					delay.insert((u, v), d);
				}
			}
		}

		LatencyCollector { delay, main_path_only, current: 0.0, total: 0.0, sessions: 0 }
	}

	fn accumulate(&mut self, u: NodeId, v: NodeId, main_path: bool) {
		if self.main_path_only && !main_path {
			return;
		}

		self.current += self.delay.get(&(u, v)).copied().unwrap_or(0.0);
	}
}

impl<C> Collector<C> for LatencyCollector
where
	C: Debug,
{
	fn session_start(&mut self, _time: f64, _receiver: NodeId, _content: &C) {
		self.current = 0.0;
	}

	fn request_hop(&mut self, u: NodeId, v: NodeId, main_path: bool) {
		self.accumulate(u, v, main_path);
	}

	fn cache_hit(&mut self, _v: NodeId) {}
	fn server_hit(&mut self, _v: NodeId) {}

	fn content_hop(&mut self, u: NodeId, v: NodeId, main_path: bool) {
		self.accumulate(u, v, main_path);
	}

	fn session_end(&mut self, _serving_node: Option<NodeId>, _hit: bool) {
		self.total += self.current;
		self.sessions += 1;
	}

	fn results(&self) -> CollectorResults {
		let mean = if self.sessions == 0 { 0.0 } else { self.total / self.sessions as f64 };

		let mut results = CollectorResults::default();
		results.insert("MEAN".to_string(), MetricValue::Scalar(mean));
		results
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::topology::{LinkType, NodeRole};

	fn line_topology() -> Topology<&'static str> {
		let mut topology: Topology<&'static str> = Topology::new();
		topology.add_node(1, NodeRole::Receiver);
		topology.add_node(2, NodeRole::Router { cache_capacity: None });
		topology.add_node(3, NodeRole::Router { cache_capacity: None });
		topology.add_edge(1, 2, 2.0, LinkType::Internal);
		topology.add_edge(2, 3, 10.0, LinkType::Internal);
		topology
	}

	#[test]
	fn reports_the_mean_round_trip_delay_over_all_sessions() {
		let topology = line_topology();
		let mut collector = LatencyCollector::new(&topology);

		Collector::<&str>::session_start(&mut collector, 3.0, 1, &"CONTENT");
		Collector::<&str>::request_hop(&mut collector, 1, 2, true);
		Collector::<&str>::content_hop(&mut collector, 2, 1, true);
		Collector::<&str>::session_end(&mut collector, Some(2), true);

		Collector::<&str>::session_start(&mut collector, 5.0, 1, &"CONTENT");
		Collector::<&str>::request_hop(&mut collector, 1, 2, true);
		Collector::<&str>::request_hop(&mut collector, 2, 3, true);
		Collector::<&str>::content_hop(&mut collector, 3, 2, true);
		Collector::<&str>::content_hop(&mut collector, 2, 1, true);
		Collector::<&str>::session_end(&mut collector, Some(3), true);

		let results: CollectorResults = Collector::<&str>::results(&collector);
		assert_eq!(results["MEAN"], MetricValue::Scalar((4.0 + 24.0) / 2.0));
	}

	#[test]
	fn side_path_hops_are_excluded_by_default() {
		let topology = line_topology();
		let mut collector = LatencyCollector::new(&topology);

		Collector::<&str>::session_start(&mut collector, 5.0, 1, &"CONTENT");
		Collector::<&str>::request_hop(&mut collector, 1, 2, true);
		Collector::<&str>::request_hop(&mut collector, 2, 3, true);
		Collector::<&str>::request_hop(&mut collector, 2, 1, false);
		Collector::<&str>::content_hop(&mut collector, 3, 2, true);
		Collector::<&str>::content_hop(&mut collector, 2, 1, true);
		Collector::<&str>::content_hop(&mut collector, 2, 3, false);
		Collector::<&str>::session_end(&mut collector, Some(3), true);

		let results: CollectorResults = Collector::<&str>::results(&collector);
		assert_eq!(results["MEAN"], MetricValue::Scalar(24.0));
	}
}
