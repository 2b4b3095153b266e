/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::collector::{Collector, CollectorResults, MetricValue};
use crate::network::topology::{NodeId, NodeRole, ShortestPaths, Topology};

/// At each `session_end`, compares the hop count of the main-path
/// response against the hop count of the shortest path from receiver
/// to the content's source, and reports the mean ratio over sessions
/// where a response was actually observed.
pub struct PathStretchCollector<C>
where
	C: Eq + Hash + Clone + Debug,
{
	shortest_paths: FxHashMap<NodeId, ShortestPaths>,
	sources: FxHashMap<C, NodeId>,

	receiver: NodeId,
	current_content: Option<C>,
	response_hops: usize,

	total_stretch: f64,
	sessions: u64,
}

impl<C> PathStretchCollector<C>
where
	C: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(topology: &Topology<C>) -> Self {
		let shortest_paths = topology.nodes().map(|node| (node, topology.dijkstra_from(node))).collect();

		let mut sources = FxHashMap::default();

		for node in topology.nodes() {
			if let Some(NodeRole::Source { contents }) = topology.role(node) {
				for content in contents {
					sources.insert(content.clone(), node);
				}
			}
		}

		PathStretchCollector {
			shortest_paths,
			sources,
			receiver: 0,
			current_content: None,
			response_hops: 0,
			total_stretch: 0.0,
			sessions: 0,
		}
	}
}

impl<C> Collector<C> for PathStretchCollector<C>
where
	C: Eq + Hash + Clone + Debug,
{
	fn session_start(&mut self, _time: f64, receiver: NodeId, content: &C) {
		self.receiver = receiver;
		self.response_hops = 0;
		self.current_content = Some(content.clone());
	}

	fn request_hop(&mut self, _u: NodeId, _v: NodeId, _main_path: bool) {}
	fn cache_hit(&mut self, _v: NodeId) {}
	fn server_hit(&mut self, _v: NodeId) {}

	fn content_hop(&mut self, _u: NodeId, _v: NodeId, main_path: bool) {
		if main_path {
			self.response_hops += 1;
		}
	}

	fn session_end(&mut self, _serving_node: Option<NodeId>, _hit: bool) {
		let Some(content) = self.current_content.take() else { return };
		let Some(&source) = self.sources.get(&content) else { return };

		let shortest_hops = self
			.shortest_paths
			.get(&self.receiver)
			.and_then(|paths| paths.path_to(source))
			.map(|path| path.len().saturating_sub(1));

		let Some(shortest_hops) = shortest_hops.filter(|&hops| hops > 0) else { return };

		self.total_stretch += self.response_hops as f64 / shortest_hops as f64;
		self.sessions += 1;
	}

	fn results(&self) -> CollectorResults {
		let mean = if self.sessions == 0 { 0.0 } else { self.total_stretch / self.sessions as f64 };

		let mut results = CollectorResults::default();
		results.insert("MEAN".to_string(), MetricValue::Scalar(mean));
		results
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::topology::LinkType;
	use rustc_hash::FxHashSet;

	fn line_topology() -> Topology<u32> {
		let mut topology: Topology<u32> = Topology::new();
		let mut contents = FxHashSet::default();
		contents.insert(4u32);

		topology.add_node(1, NodeRole::Receiver);
		topology.add_node(2, NodeRole::Router { cache_capacity: Some(10) });
		topology.add_node(3, NodeRole::Source { contents });
		topology.add_edge(1, 2, 1.0, LinkType::Internal);
		topology.add_edge(2, 3, 1.0, LinkType::Internal);
		topology
	}

	#[test]
	fn a_response_that_follows_the_shortest_path_has_no_stretch() {
		let topology = line_topology();
		let mut collector = PathStretchCollector::new(&topology);

		Collector::<u32>::session_start(&mut collector, 0.0, 1, &4);
		Collector::<u32>::content_hop(&mut collector, 3, 2, true);
		Collector::<u32>::content_hop(&mut collector, 2, 1, true);
		Collector::<u32>::session_end(&mut collector, Some(3), true);

		let results: CollectorResults = Collector::<u32>::results(&collector);
		assert_eq!(results["MEAN"], MetricValue::Scalar(1.0));
	}

	#[test]
	fn side_path_content_hops_do_not_count_toward_the_response_length() {
		let topology = line_topology();
		let mut collector = PathStretchCollector::new(&topology);

		Collector::<u32>::session_start(&mut collector, 0.0, 1, &4);
		Collector::<u32>::content_hop(&mut collector, 3, 2, true);
		Collector::<u32>::content_hop(&mut collector, 2, 2, false);
		Collector::<u32>::content_hop(&mut collector, 2, 1, true);
		Collector::<u32>::session_end(&mut collector, Some(3), true);

		let results: CollectorResults = Collector::<u32>::results(&collector);
		assert_eq!(results["MEAN"], MetricValue::Scalar(1.0));
	}
}
