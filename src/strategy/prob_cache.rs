/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rand::Rng;

use crate::network::{controller::NetworkController, error::NetworkError, topology::NodeId};
use crate::strategy::{Strategy, StrategyError};

const DEFAULT_T_TW: f64 = 10.0;

/// Caches probabilistically along the return path, weighting the
/// insertion probability by the caching space still available between
/// the current node and the point the content was served from.
#[derive(Debug)]
pub struct ProbCache {
	t_tw: f64,
}

impl ProbCache {
	#[must_use]
	pub fn new() -> Self {
		ProbCache { t_tw: DEFAULT_T_TW }
	}

	#[must_use]
	pub fn with_t_tw(t_tw: f64) -> Self {
		ProbCache { t_tw }
	}
}

impl Default for ProbCache {
	fn default() -> Self {
		ProbCache::new()
	}
}

impl<C> Strategy<C> for ProbCache
where
	C: Eq + Hash + Clone + Debug,
{
	fn process_event(
		&mut self,
		controller: &mut NetworkController<C>,
		time: f64,
		receiver: NodeId,
		content: C,
		log: bool,
	) -> Result<(), StrategyError> {
		let source = controller
			.view()
			.content_source(&content)
			.ok_or_else(|| StrategyError::NoSource(format!("{content:?}")))?;
		let path = controller
			.view()
			.shortest_path(receiver, source)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{receiver:?}"), format!("{source:?}"))))?;

		controller.start_session(time, receiver, content, log)?;

		let mut serving_node = None;

		for window in path.windows(2) {
			let (u, v) = (window[0], window[1]);
			controller.forward_request_hop(u, v, true)?;

			if controller.view().has_cache(v) && controller.get_content(v)? {
				serving_node = Some(v);
				break;
			}
		}

		let serving_node = match serving_node {
			Some(node) => node,
			None => {
				let last = *path.last().expect("path is non-empty");

				if !controller.get_content(last)? {
					return Err(StrategyError::SourceMiss);
				}

				last
			}
		};

		let return_path: Vec<NodeId> = controller
			.view()
			.shortest_path(serving_node, receiver)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{serving_node:?}"), format!("{receiver:?}"))))?;

		let capacities: Vec<Option<f64>> =
			return_path.iter().map(|&node| controller.view().cache_capacity(node).map(|c| c as f64)).collect();

		let c = capacities.iter().filter(|cap| cap.is_some()).count() as f64;

		let mut suffix = vec![0.0; return_path.len() + 1];
		for i in (0..return_path.len()).rev() {
			suffix[i] = suffix[i + 1] + capacities[i].unwrap_or(0.0);
		}

		let mut x = 0.0;
		let mut rng = rand::thread_rng();

		for (i, window) in return_path.windows(2).enumerate() {
			let (u, v) = (window[0], window[1]);
			let n = suffix[i];

			if capacities[i + 1].is_some() {
				x += 1.0;
			}

			controller.forward_content_hop(u, v, true)?;

			if v != receiver {
				if let Some(capacity_v) = capacities[i + 1] {
					let prob = n / (self.t_tw * capacity_v) * (x / c).powf(c);

					if rng.gen_bool(prob.clamp(0.0, 1.0)) {
						controller.put_content(v)?;
					}
				}
			}
		}

		controller.end_session()?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::LruCache;
	use crate::collector::CollectorProxy;
	use crate::network::{model::NetworkModel, topology::{LinkType, NodeRole, Topology}};
	use rustc_hash::FxHashSet;
	use std::sync::Arc;

	fn five_node_line() -> Topology<u32> {
		let mut contents = FxHashSet::default();
		contents.insert(7u32);

		let mut topology: Topology<u32> = Topology::new();
		topology.add_node(0, NodeRole::Receiver);
		topology.add_node(1, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(2, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(3, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(4, NodeRole::Source { contents });

		for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
			topology.add_edge(u, v, 1.0, LinkType::Internal);
		}

		topology
	}

	#[test]
	fn a_cache_miss_at_every_node_still_serves_from_the_source() {
		let topology = five_node_line();
		let mut model = NetworkModel::new(topology).unwrap();

		for node in [1, 2, 3] {
			model.install_cache(node, 4, Arc::new(|c| Box::new(LruCache::<u32>::new(c))));
		}

		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		let mut strategy = ProbCache::new();
		strategy.process_event(&mut controller, 0.0, 0, 7, true).unwrap();

		assert!(!controller.is_session_open());
	}

	#[test]
	fn t_tw_of_zero_never_caches_because_probability_is_always_clamped_down() {
		let topology = five_node_line();
		let mut model = NetworkModel::new(topology).unwrap();

		for node in [1, 2, 3] {
			model.install_cache(node, 4, Arc::new(|c| Box::new(LruCache::<u32>::new(c))));
		}

		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		// An extremely large t_tw drives every probability toward zero.
		let mut strategy = ProbCache::with_t_tw(1e9);
		strategy.process_event(&mut controller, 0.0, 0, 7, true).unwrap();

		for node in [1, 2, 3] {
			assert!(!controller.view().cache_lookup(node, &7));
		}
	}
}
