/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use crate::network::{controller::NetworkController, topology::NodeId};
use crate::strategy::{Strategy, StrategyError};

/// Forwards every request straight to the source; never touches a cache.
#[derive(Debug, Default)]
pub struct NoCache;

impl NoCache {
	#[must_use]
	pub fn new() -> Self {
		NoCache
	}
}

impl<C> Strategy<C> for NoCache
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

		controller.start_session(time, receiver, content, log)?;
		controller.forward_request_path(receiver, source)?;

		if !controller.get_content(source)? {
			return Err(StrategyError::SourceMiss);
		}

		controller.forward_content_path(source, receiver, None, true)?;
		controller.end_session()?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::collector::CollectorProxy;
	use crate::network::{model::NetworkModel, topology::{LinkType, NodeRole, Topology}};
	use rustc_hash::FxHashSet;

	fn line_topology() -> Topology<u32> {
		let mut contents = FxHashSet::default();
		contents.insert(2u32);

		let mut topology: Topology<u32> = Topology::new();
		topology.add_node(0, NodeRole::Receiver);
		topology.add_node(1, NodeRole::Router { cache_capacity: None });
		topology.add_node(2, NodeRole::Source { contents });
		topology.add_edge(0, 1, 1.0, LinkType::Internal);
		topology.add_edge(1, 2, 1.0, LinkType::Internal);
		topology
	}

	#[test]
	fn routes_straight_to_source_with_no_insertions() {
		let topology = line_topology();
		let mut model = NetworkModel::new(topology).unwrap();
		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		let mut strategy = NoCache::new();
		strategy.process_event(&mut controller, 0.0, 0, 2, true).unwrap();

		assert!(!controller.is_session_open());
	}
}
