/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::collector::{Collector, CollectorResults, MetricValue};
use crate::network::topology::{LinkType, NodeId, Topology};

/// Accumulates `request_size` bytes per request hop and `content_size`
/// bytes per content hop, keyed by directed link, regardless of
/// whether the hop lies on the main path. At `results()` time, each
/// link's total is divided by the simulated duration (the span between
/// the first and last session start seen) and reported as a mean,
/// split by link type.
#[derive(Debug)]
pub struct LinkLoadCollector {
	link_type: FxHashMap<(NodeId, NodeId), LinkType>,
	req_size: f64,
	content_size: f64,

	bytes: FxHashMap<(NodeId, NodeId), f64>,
	first_time: Option<f64>,
	last_time: f64,
}

impl LinkLoadCollector {
	#[must_use]
	pub fn new<C>(topology: &Topology<C>, req_size: f64, content_size: f64) -> Self {
		let mut link_type = FxHashMap::default();

		for u in topology.nodes() {
			for &v in topology.neighbors(u) {
				if let Some(lt) = topology.link_type(u, v) {
					link_type.insert((u, v), lt);
				}
			}
		}

		LinkLoadCollector {
			link_type,
			req_size,
			content_size,
			bytes: FxHashMap::default(),
			first_time: None,
			last_time: 0.0,
		}
	}

	fn duration(&self) -> f64 {
		match self.first_time {
			Some(first) if self.last_time > first => self.last_time - first,
			_ => 1.0,
		}
	}
}

impl<C> Collector<C> for LinkLoadCollector
where
	C: Debug,
{
	fn session_start(&mut self, time: f64, _receiver: NodeId, _content: &C) {
		if self.first_time.is_none() {
			self.first_time = Some(time);
		}

		self.last_time = time;
	}

	fn request_hop(&mut self, u: NodeId, v: NodeId, _main_path: bool) {
		*self.bytes.entry((u, v)).or_insert(0.0) += self.req_size;
	}

	fn cache_hit(&mut self, _v: NodeId) {}
	fn server_hit(&mut self, _v: NodeId) {}

	fn content_hop(&mut self, u: NodeId, v: NodeId, _main_path: bool) {
		*self.bytes.entry((u, v)).or_insert(0.0) += self.content_size;
	}

	fn session_end(&mut self, _serving_node: Option<NodeId>, _hit: bool) {}

	fn results(&self) -> CollectorResults {
		let duration = self.duration();

		let mut per_link_internal = FxHashMap::default();
		let mut per_link_external = FxHashMap::default();

		for (&link, &total) in &self.bytes {
			let load = total / duration;

			match self.link_type.get(&link) {
				Some(LinkType::Internal) => {
					per_link_internal.insert(link, load);
				}
				Some(LinkType::External) => {
					per_link_external.insert(link, load);
				}
				None => {}
			}
		}

		let mean = |per_link: &FxHashMap<(NodeId, NodeId), f64>| {
			if per_link.is_empty() {
				0.0
			} else {
				per_link.values().sum::<f64>() / per_link.len() as f64
			}
		};

		let mean_internal = mean(&per_link_internal);
		let mean_external = mean(&per_link_external);

		let mut results = CollectorResults::default();
		results.insert("MEAN_INTERNAL".to_string(), MetricValue::Scalar(mean_internal));
		results.insert("MEAN_EXTERNAL".to_string(), MetricValue::Scalar(mean_external));
		results.insert("PER_LINK_INTERNAL".to_string(), MetricValue::PerLink(per_link_internal));
		results.insert("PER_LINK_EXTERNAL".to_string(), MetricValue::PerLink(per_link_external));
		results
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::topology::NodeRole;

	fn line_topology() -> Topology<u32> {
		let mut topology: Topology<u32> = Topology::new();
		topology.add_node(1, NodeRole::Receiver);
		topology.add_node(2, NodeRole::Router { cache_capacity: None });
		topology.add_node(3, NodeRole::Router { cache_capacity: None });
		topology.add_edge(1, 2, 1.0, LinkType::Internal);
		topology.add_edge(2, 3, 1.0, LinkType::External);
		topology
	}

	#[test]
	fn splits_load_by_link_type_and_divides_by_duration() {
		let topology = line_topology();
		let mut collector = LinkLoadCollector::new(&topology, 500.0, 700.0);

		Collector::<u32>::session_start(&mut collector, 3.0, 1, &4);
		Collector::<u32>::request_hop(&mut collector, 1, 2, true);
		Collector::<u32>::content_hop(&mut collector, 2, 1, true);
		Collector::<u32>::session_end(&mut collector, Some(1), true);

		Collector::<u32>::session_start(&mut collector, 5.0, 1, &4);
		Collector::<u32>::request_hop(&mut collector, 1, 2, true);
		Collector::<u32>::request_hop(&mut collector, 2, 3, true);
		Collector::<u32>::content_hop(&mut collector, 3, 2, true);
		Collector::<u32>::content_hop(&mut collector, 2, 1, true);
		Collector::<u32>::session_end(&mut collector, Some(3), true);

		let results: CollectorResults = Collector::<u32>::results(&collector);

		match &results["PER_LINK_INTERNAL"] {
			MetricValue::PerLink(map) => {
				assert_eq!(map[&(1, 2)], 2.0 * 500.0 / 2.0);
				assert_eq!(map[&(2, 1)], 2.0 * 700.0 / 2.0);
			}
			other => panic!("unexpected variant: {other:?}"),
		}

		assert_eq!(results["MEAN_INTERNAL"], MetricValue::Scalar((500.0 + 700.0) / 2.0));
		assert_eq!(results["MEAN_EXTERNAL"], MetricValue::Scalar((500.0 + 700.0) / 4.0));
	}

	#[test]
	fn unused_link_type_reports_an_empty_breakdown() {
		let mut topology: Topology<u32> = Topology::new();
		topology.add_node(1, NodeRole::Receiver);
		topology.add_node(2, NodeRole::Router { cache_capacity: None });
		topology.add_edge(1, 2, 1.0, LinkType::Internal);

		let mut collector = LinkLoadCollector::new(&topology, 500.0, 700.0);

		Collector::<u32>::session_start(&mut collector, 3.0, 1, &4);
		Collector::<u32>::request_hop(&mut collector, 1, 2, true);
		Collector::<u32>::session_end(&mut collector, Some(2), true);

		Collector::<u32>::session_start(&mut collector, 5.0, 1, &4);
		Collector::<u32>::session_end(&mut collector, Some(2), true);

		let results: CollectorResults = Collector::<u32>::results(&collector);
		assert_eq!(results["MEAN_EXTERNAL"], MetricValue::Scalar(0.0));

		match &results["PER_LINK_EXTERNAL"] {
			MetricValue::PerLink(map) => assert!(map.is_empty()),
			other => panic!("unexpected variant: {other:?}"),
		}
	}
}
