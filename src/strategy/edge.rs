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

/// Queries only the first cache encountered on the path toward the
/// source; on a miss there, fetches from source and inserts a single
/// copy back at that same first cache.
#[derive(Debug, Default)]
pub struct Edge;

impl Edge {
	#[must_use]
	pub fn new() -> Self {
		Edge
	}
}

impl<C> Strategy<C> for Edge
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
		let view = controller.view();
		let source = view.content_source(&content).ok_or_else(|| StrategyError::NoSource(format!("{content:?}")))?;
		let path = view
			.shortest_path(receiver, source)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{receiver:?}"), format!("{source:?}"))))?;

		controller.start_session(time, receiver, content, log)?;

		let mut edge_cache = None;
		let mut serving_node = None;
		let mut last = receiver;

		for window in path.windows(2) {
			let (u, v) = (window[0], window[1]);
			controller.forward_request_hop(u, v, true)?;
			last = v;

			if controller.view().has_cache(v) {
				edge_cache = Some(v);

				if controller.get_content(v)? {
					serving_node = Some(v);
				} else {
					controller.forward_request_path(v, source)?;
					controller.get_content(source)?;
					serving_node = Some(source);
				}

				break;
			}
		}

		let serving_node = match serving_node {
			Some(node) => node,
			None => {
				controller.get_content(last)?;
				last
			}
		};

		let return_path: Vec<NodeId> = controller
			.view()
			.shortest_path(receiver, serving_node)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{receiver:?}"), format!("{serving_node:?}"))))?
			.into_iter()
			.rev()
			.collect();

		controller.forward_content_path(serving_node, receiver, Some(&return_path), true)?;

		if serving_node == source {
			if let Some(cache) = edge_cache {
				controller.put_content(cache)?;
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

	fn line_topology() -> Topology<u32> {
		let mut contents = FxHashSet::default();
		contents.insert(2u32);

		let mut topology: Topology<u32> = Topology::new();
		topology.add_node(0, NodeRole::Receiver);
		topology.add_node(1, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(2, NodeRole::Source { contents });
		topology.add_edge(0, 1, 1.0, LinkType::Internal);
		topology.add_edge(1, 2, 1.0, LinkType::Internal);
		topology
	}

	#[test]
	fn a_miss_at_the_edge_cache_fetches_from_source_and_inserts_there() {
		let topology = line_topology();
		let mut model = NetworkModel::new(topology).unwrap();
		model.install_cache(1, 4, Arc::new(|c| Box::new(LruCache::<u32>::new(c))));

		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		let mut strategy = Edge::new();
		strategy.process_event(&mut controller, 0.0, 0, 2, true).unwrap();

		assert!(controller.view().cache_lookup(1, &2));
	}
}
