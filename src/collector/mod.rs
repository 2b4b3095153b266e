/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod hit_ratio;
mod latency;
mod link_load;
mod path_stretch;

pub use hit_ratio::CacheHitRatioCollector;
pub use latency::LatencyCollector;
pub use link_load::LinkLoadCollector;
pub use path_stretch::PathStretchCollector;

use std::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::network::topology::NodeId;

/// A single metric value in a collector's result dump: either a scalar
/// or a breakdown keyed by node or by directed link.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
	Scalar(f64),
	PerNode(FxHashMap<NodeId, f64>),
	PerLink(FxHashMap<(NodeId, NodeId), f64>),
}

pub type CollectorResults = FxHashMap<String, MetricValue>;

/// Event sink fed by the controller. Every method is a notification,
/// not a query; collectors never reach back into the model.
pub trait Collector<C>
where
	C: Debug,
{
	fn session_start(&mut self, time: f64, receiver: NodeId, content: &C);

	fn request_hop(&mut self, u: NodeId, v: NodeId, main_path: bool);

	fn cache_hit(&mut self, v: NodeId);

	fn server_hit(&mut self, v: NodeId);

	fn content_hop(&mut self, u: NodeId, v: NodeId, main_path: bool);

	fn session_end(&mut self, serving_node: Option<NodeId>, hit: bool);

	fn results(&self) -> CollectorResults;
}

/// Fans every event out to a fixed set of attached collectors, in
/// attachment order, and merges their dumps keyed by collector name.
pub struct CollectorProxy<C>
where
	C: Debug,
{
	collectors: Vec<(String, Box<dyn Collector<C>>)>,
}

impl<C> CollectorProxy<C>
where
	C: Debug,
{
	#[must_use]
	pub fn new() -> Self {
		CollectorProxy { collectors: Vec::new() }
	}

	pub fn attach(&mut self, name: impl Into<String>, collector: Box<dyn Collector<C>>) {
		self.collectors.push((name.into(), collector));
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.collectors.is_empty()
	}

	pub fn session_start(&mut self, time: f64, receiver: NodeId, content: &C) {
		for (_, collector) in &mut self.collectors {
			collector.session_start(time, receiver, content);
		}
	}

	pub fn request_hop(&mut self, u: NodeId, v: NodeId, main_path: bool) {
		for (_, collector) in &mut self.collectors {
			collector.request_hop(u, v, main_path);
		}
	}

	pub fn cache_hit(&mut self, v: NodeId) {
		for (_, collector) in &mut self.collectors {
			collector.cache_hit(v);
		}
	}

	pub fn server_hit(&mut self, v: NodeId) {
		for (_, collector) in &mut self.collectors {
			collector.server_hit(v);
		}
	}

	pub fn content_hop(&mut self, u: NodeId, v: NodeId, main_path: bool) {
		for (_, collector) in &mut self.collectors {
			collector.content_hop(u, v, main_path);
		}
	}

	pub fn session_end(&mut self, serving_node: Option<NodeId>, hit: bool) {
		for (_, collector) in &mut self.collectors {
			collector.session_end(serving_node, hit);
		}
	}

	#[must_use]
	pub fn results(&self) -> FxHashMap<String, CollectorResults> {
		self.collectors
			.iter()
			.map(|(name, collector)| (name.clone(), collector.results()))
			.collect()
	}
}

impl<C> Default for CollectorProxy<C>
where
	C: Debug,
{
	fn default() -> Self {
		Self::new()
	}
}
