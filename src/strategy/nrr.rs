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

/// The metacaching policy applied on the return path once the nearest
/// replica has answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metacaching {
	Lce,
	Lcd,
}

/// Ideal nearest-replica routing: the request is forwarded directly to
/// whichever replica (cache or source) is topologically closest to the
/// receiver, as if routing had perfect knowledge of every copy's
/// location. Only the LCE and LCD metacaching policies are supported on
/// the return path.
pub struct NearestReplicaRouting {
	metacaching: Metacaching,
}

impl NearestReplicaRouting {
	#[must_use]
	pub fn new(metacaching: Metacaching) -> Self {
		NearestReplicaRouting { metacaching }
	}
}

impl<C> Strategy<C> for NearestReplicaRouting
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
		let nearest_replica = {
			let view = controller.view();
			let locations = view.content_locations(&content);

			locations
				.into_iter()
				.min_by(|&a, &b| {
					let da = view.shortest_path_length(receiver, a).unwrap_or(f64::INFINITY);
					let db = view.shortest_path_length(receiver, b).unwrap_or(f64::INFINITY);
					da.partial_cmp(&db).expect("path lengths are never NaN")
				})
				.ok_or_else(|| StrategyError::NoSource(format!("{content:?}")))?
		};

		let content_for_lce = content.clone();

		controller.start_session(time, receiver, content, log)?;
		controller.forward_request_path(receiver, nearest_replica)?;
		controller.get_content(nearest_replica)?;

		let return_path: Vec<NodeId> = controller
			.view()
			.shortest_path(nearest_replica, receiver)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{nearest_replica:?}"), format!("{receiver:?}"))))?;

		match self.metacaching {
			Metacaching::Lce => {
				for window in return_path.windows(2) {
					let (u, v) = (window[0], window[1]);
					let already_cached = controller.view().cache_lookup(v, &content_for_lce);
					controller.forward_content_hop(u, v, true)?;

					if controller.view().has_cache(v) && !already_cached {
						controller.put_content(v)?;
					}
				}
			}
			Metacaching::Lcd => {
				let mut copied = false;

				for window in return_path.windows(2) {
					let (u, v) = (window[0], window[1]);
					controller.forward_content_hop(u, v, true)?;

					if !copied && v != receiver && controller.view().has_cache(v) {
						controller.put_content(v)?;
						copied = true;
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

	/// A diamond: 0 (receiver) -> {1, 2} -> 3 (cache) -> 4 (source), with
	/// node 1 on the short leg.
	fn diamond_topology() -> Topology<u32> {
		let mut contents = FxHashSet::default();
		contents.insert(9u32);

		let mut topology: Topology<u32> = Topology::new();
		topology.add_node(0, NodeRole::Receiver);
		topology.add_node(1, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(2, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(3, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(4, NodeRole::Source { contents });

		topology.add_edge(0, 1, 1.0, LinkType::Internal);
		topology.add_edge(0, 2, 5.0, LinkType::Internal);
		topology.add_edge(1, 3, 1.0, LinkType::Internal);
		topology.add_edge(2, 3, 5.0, LinkType::Internal);
		topology.add_edge(3, 4, 1.0, LinkType::Internal);

		topology
	}

	#[test]
	fn lcd_metacaching_caches_only_one_hop_below_the_nearest_replica() {
		let topology = diamond_topology();
		let mut model = NetworkModel::new(topology).unwrap();

		for node in [1, 2, 3] {
			model.install_cache(node, 4, Arc::new(|c| Box::new(LruCache::<u32>::new(c))));
		}

		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		let mut strategy = NearestReplicaRouting::new(Metacaching::Lcd);
		strategy.process_event(&mut controller, 0.0, 0, 9, true).unwrap();

		assert!(controller.view().cache_lookup(3, &9));
		assert!(!controller.view().cache_lookup(1, &9));
	}
}
