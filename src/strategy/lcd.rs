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

/// Leave-copy-down: on the way back, inserts a copy only one hop closer
/// to the receiver than wherever the content was actually found.
#[derive(Debug, Default)]
pub struct LeaveCopyDown;

impl LeaveCopyDown {
	#[must_use]
	pub fn new() -> Self {
		LeaveCopyDown
	}
}

impl<C> Strategy<C> for LeaveCopyDown
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

		if return_path.len() >= 2 {
			let next_hop = return_path[1];

			if controller.view().has_cache(next_hop) {
				controller.put_content(next_hop)?;
			}
		}

		controller.end_session()?;
		Ok(())
	}
}
