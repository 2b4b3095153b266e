/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rand::seq::SliceRandom;

use crate::network::{controller::NetworkController, error::NetworkError, topology::NodeId};
use crate::strategy::{Strategy, StrategyError};

/// Picks exactly one cache node on the return path, uniformly at
/// random, and stores the content there.
#[derive(Debug, Default)]
pub struct RandomChoice;

impl RandomChoice {
	#[must_use]
	pub fn new() -> Self {
		RandomChoice
	}
}

impl<C> Strategy<C> for RandomChoice
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

		let caches: Vec<NodeId> = if return_path.len() > 2 {
			return_path[1..return_path.len() - 1].iter().copied().filter(|&v| controller.view().has_cache(v)).collect()
		} else {
			Vec::new()
		};

		let designated_cache = caches.choose(&mut rand::thread_rng()).copied();

		for window in return_path.windows(2) {
			let (u, v) = (window[0], window[1]);
			controller.forward_content_hop(u, v, true)?;

			if Some(v) == designated_cache {
				controller.put_content(v)?;
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
	fn stores_a_copy_at_exactly_one_cache_node() {
		let topology = five_node_line();
		let mut model = NetworkModel::new(topology).unwrap();

		for node in [1, 2, 3] {
			model.install_cache(node, 4, Arc::new(|c| Box::new(LruCache::<u32>::new(c))));
		}

		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		let mut strategy = RandomChoice::new();
		strategy.process_event(&mut controller, 0.0, 0, 7, true).unwrap();

		let cached_count = [1, 2, 3].iter().filter(|&&n| controller.view().cache_lookup(n, &7)).count();
		assert_eq!(cached_count, 1);
	}
}
