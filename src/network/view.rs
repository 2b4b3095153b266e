/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::network::{
	model::NetworkModel,
	topology::{LinkType, NodeId, ShortestPaths, Topology},
};

/// Read-only view over a [`NetworkModel`], the only access strategies
/// get to the model's state; every mutation goes through the controller.
pub struct NetworkView<'a, C>
where
	C: Eq + Hash + Clone + Debug,
{
	model: &'a NetworkModel<C>,
}

impl<'a, C> NetworkView<'a, C>
where
	C: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(model: &'a NetworkModel<C>) -> Self {
		NetworkView { model }
	}

	#[must_use]
	pub fn topology(&self) -> &Topology<C> {
		self.model.topology()
	}

	#[must_use]
	pub fn content_source(&self, content: &C) -> Option<NodeId> {
		self.model.topology().content_source(content)
	}

	/// Every cache node currently holding `content`, plus its source.
	#[must_use]
	pub fn content_locations(&self, content: &C) -> FxHashSet<NodeId> {
		let mut locations: FxHashSet<NodeId> =
			self.model.topology().cache_nodes().filter(|&node| self.cache_lookup(node, content)).collect();

		if let Some(source) = self.content_source(content) {
			locations.insert(source);
		}

		locations
	}

	#[must_use]
	pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
		self.model.shortest_paths_from(from)?.path_to(to)
	}

	#[must_use]
	pub fn shortest_path_length(&self, from: NodeId, to: NodeId) -> Option<f64> {
		self.model.shortest_paths_from(from)?.distance_to(to)
	}

	#[must_use]
	pub fn has_cache(&self, node: NodeId) -> bool {
		self.model.has_cache(node)
	}

	#[must_use]
	pub fn has_local_cache(&self, node: NodeId) -> bool {
		self.model.has_local_cache(node)
	}

	/// Non-mutating membership peek; never reorders the cache's policy.
	#[must_use]
	pub fn cache_lookup(&self, node: NodeId, content: &C) -> bool {
		self.model.cache(node).is_some_and(|cache| cache.has(content))
	}

	#[must_use]
	pub fn local_cache_lookup(&self, node: NodeId, content: &C) -> bool {
		self.model.local_cache(node).is_some_and(|cache| cache.has(content))
	}

	pub fn cache_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.model.topology().cache_nodes()
	}

	#[must_use]
	pub fn cluster(&self, node: NodeId) -> Option<usize> {
		self.model.topology().cluster_of(node)
	}

	#[must_use]
	pub fn link_type(&self, u: NodeId, v: NodeId) -> Option<LinkType> {
		self.model.topology().link_type(u, v)
	}

	#[must_use]
	pub fn link_delay(&self, u: NodeId, v: NodeId) -> Option<f64> {
		self.model.topology().delay(u, v)
	}

	#[must_use]
	pub fn cache_capacity(&self, node: NodeId) -> Option<usize> {
		self.model.cache_capacity(node)
	}

	/// The all-pairs shortest-path table computed once at model
	/// construction, keyed by source node.
	#[must_use]
	pub fn all_pairs_shortest_paths(&self) -> &FxHashMap<NodeId, ShortestPaths> {
		self.model.all_shortest_paths()
	}
}
