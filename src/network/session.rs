/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::network::topology::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
	pub from: NodeId,
	pub to: NodeId,
	pub main_path: bool,
}

/// Transient record of one request, from `start_session` to `end_session`.
#[derive(Debug, Clone)]
pub struct Session<C> {
	pub start_time: f64,
	pub receiver: NodeId,
	pub content: C,
	pub log: bool,

	pub request_hops: Vec<Hop>,
	pub response_hops: Vec<Hop>,

	pub serving_node: Option<NodeId>,
	pub cache_hit: bool,
	pub cache_hit_node: Option<NodeId>,

	pub(crate) hit_reported: bool,
}

impl<C> Session<C> {
	pub(crate) fn new(start_time: f64, receiver: NodeId, content: C, log: bool) -> Self {
		Session {
			start_time,
			receiver,
			content,
			log,
			request_hops: Vec::new(),
			response_hops: Vec::new(),
			serving_node: None,
			cache_hit: false,
			cache_hit_node: None,
			hit_reported: false,
		}
	}
}
