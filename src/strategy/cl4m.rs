/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::network::{controller::NetworkController, error::NetworkError, topology::{betweenness_centrality, NodeId, Topology}};
use crate::strategy::{Strategy, StrategyError};

/// Caches content at the single highest-betweenness-centrality node on
/// the return path, picking the node closest to the receiver on ties.
pub struct CacheLessForMore {
	betweenness: FxHashMap<NodeId, f64>,
}

impl CacheLessForMore {
	#[must_use]
	pub fn new<C>(topology: &Topology<C>) -> Self
	where
		C: Eq + Hash + Clone + Debug,
	{
		CacheLessForMore { betweenness: betweenness_centrality(topology) }
	}
}

impl<C> Strategy<C> for CacheLessForMore
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

		let mut max_betw = -1.0;
		let mut designated_cache = None;

		for &v in &return_path[1..] {
			if controller.view().has_cache(v) {
				let betw = *self.betweenness.get(&v).unwrap_or(&0.0);

				if betw >= max_betw {
					max_betw = betw;
					designated_cache = Some(v);
				}
			}
		}

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
	use crate::network::{model::NetworkModel, topology::{LinkType, NodeRole}};
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
	fn caches_only_at_the_single_designated_node_on_a_line() {
		let topology = five_node_line();
		let betweenness_source = {
			let mut t: Topology<u32> = Topology::new();
			let mut contents = FxHashSet::default();
			contents.insert(7u32);
			t.add_node(0, NodeRole::Receiver);
			t.add_node(1, NodeRole::Router { cache_capacity: Some(4) });
			t.add_node(2, NodeRole::Router { cache_capacity: Some(4) });
			t.add_node(3, NodeRole::Router { cache_capacity: Some(4) });
			t.add_node(4, NodeRole::Source { contents });
			for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
				t.add_edge(u, v, 1.0, LinkType::Internal);
			}
			t
		};

		let mut model = NetworkModel::new(topology).unwrap();

		for node in [1, 2, 3] {
			model.install_cache(node, 4, Arc::new(|c| Box::new(LruCache::<u32>::new(c))));
		}

		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		let mut strategy = CacheLessForMore::new(&betweenness_source);
		strategy.process_event(&mut controller, 0.0, 0, 7, true).unwrap();

		let cached_count = [1, 2, 3].iter().filter(|&&n| controller.view().cache_lookup(n, &7)).count();
		assert_eq!(cached_count, 1);
	}
}
