/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use crate::network::{controller::NetworkController, error::NetworkError, topology::NodeId};
use crate::strategy::{Strategy, StrategyError};

/// Inserts a copy of the content at every cache node on the response
/// path, not just the first one encountered.
#[derive(Debug, Default)]
pub struct LeaveCopyEverywhere;

impl LeaveCopyEverywhere {
	#[must_use]
	pub fn new() -> Self {
		LeaveCopyEverywhere
	}
}

impl<C> Strategy<C> for LeaveCopyEverywhere
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

		let mut serving_node = None;

		{
			let view = controller.view();
			let path = view
				.shortest_path(receiver, source)
				.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{receiver:?}"), format!("{source:?}"))))?;

			for window in path.windows(2) {
				if view.cache_lookup(window[1], &content) {
					serving_node = Some(window[1]);
					break;
				}
			}
		}

		controller.start_session(time, receiver, content, log)?;
		controller.forward_request_path(receiver, serving_node.unwrap_or(source))?;

		let serving_node = match serving_node {
			Some(node) => {
				controller.get_content(node)?;
				node
			}
			None => {
				if !controller.get_content(source)? {
					return Err(StrategyError::SourceMiss);
				}

				source
			}
		};

		let return_path: Vec<NodeId> = controller
			.view()
			.shortest_path(serving_node, receiver)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{serving_node:?}"), format!("{receiver:?}"))))?;

		controller.forward_content_path(serving_node, receiver, Some(&return_path), true)?;

		for node in &return_path {
			if controller.view().has_cache(*node) && *node != serving_node {
				controller.put_content(*node)?;
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
	fn one_request_leaves_a_copy_at_every_router_on_the_path() {
		let topology = five_node_line();
		let mut model = NetworkModel::new(topology).unwrap();

		for node in [1, 2, 3] {
			model.install_cache(node, 4, Arc::new(|c| Box::new(LruCache::<u32>::new(c))));
		}

		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		let mut strategy = LeaveCopyEverywhere::new();
		strategy.process_event(&mut controller, 0.0, 0, 7, true).unwrap();

		for node in [1, 2, 3] {
			assert!(controller.view().cache_lookup(node, &7));
		}
	}
}
