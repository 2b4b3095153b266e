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

const DEFAULT_P: f64 = 0.2;

/// Inserts a copy at every cache node on the return path independently,
/// each with fixed probability `p`.
#[derive(Debug)]
pub struct RandomBernoulli {
	p: f64,
}

impl RandomBernoulli {
	#[must_use]
	pub fn new() -> Self {
		RandomBernoulli { p: DEFAULT_P }
	}

	#[must_use]
	pub fn with_probability(p: f64) -> Self {
		assert!((0.0..=1.0).contains(&p), "insertion probability must be in [0, 1]");
		RandomBernoulli { p }
	}
}

impl Default for RandomBernoulli {
	fn default() -> Self {
		RandomBernoulli::new()
	}
}

impl<C> Strategy<C> for RandomBernoulli
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

		let mut rng = rand::thread_rng();

		for window in return_path.windows(2) {
			let (u, v) = (window[0], window[1]);
			controller.forward_content_hop(u, v, true)?;

			if v != receiver && controller.view().has_cache(v) && rng.gen_bool(self.p) {
				controller.put_content(v)?;
			}
		}

		controller.end_session()?;
		Ok(())
	}
}
