/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::cache::Cache;
use crate::network::{
	error::NetworkError,
	topology::{NodeId, ShortestPaths, Topology},
};

type CacheFactory<C> = Arc<dyn Fn(usize) -> Box<dyn Cache<C>> + Send + Sync>;

/// Owns the topology, every cache node's coordinated and (optional)
/// uncoordinated local cache, and the all-pairs shortest-path table
/// computed once at construction.
pub struct NetworkModel<C>
where
	C: Eq + Hash + Clone + Debug,
{
	topology: Topology<C>,
	shortest_paths: FxHashMap<NodeId, ShortestPaths>,

	caches: FxHashMap<NodeId, Box<dyn Cache<C>>>,
	local_caches: FxHashMap<NodeId, Box<dyn Cache<C>>>,

	cache_factories: FxHashMap<NodeId, CacheFactory<C>>,
	cache_capacities: FxHashMap<NodeId, usize>,

	simulation_started: bool,
}

impl<C> NetworkModel<C>
where
	C: Eq + Hash + Clone + Debug,
{
	pub fn new(topology: Topology<C>) -> Result<Self, NetworkError> {
		if !topology.is_connected() {
			return Err(NetworkError::Disconnected);
		}

		let shortest_paths = topology.nodes().map(|node| (node, topology.dijkstra_from(node))).collect();

		Ok(NetworkModel {
			topology,
			shortest_paths,
			caches: FxHashMap::default(),
			local_caches: FxHashMap::default(),
			cache_factories: FxHashMap::default(),
			cache_capacities: FxHashMap::default(),
			simulation_started: false,
		})
	}

	/// Installs a cache at `node` of the given capacity, built by
	/// `factory`. The factory is retained so [`Self::reserve_local_cache`]
	/// can later rebuild the node's cache at a smaller coordinated
	/// capacity plus a local one.
	pub fn install_cache(&mut self, node: NodeId, capacity: usize, factory: CacheFactory<C>) {
		let cache = factory(capacity);

		self.caches.insert(node, cache);
		self.cache_factories.insert(node, factory);
		self.cache_capacities.insert(node, capacity);
	}

	pub(crate) fn mark_simulation_started(&mut self) {
		self.simulation_started = true;
	}

	#[must_use]
	pub fn has_simulation_started(&self) -> bool {
		self.simulation_started
	}

	/// Splits every installed cache's capacity into a coordinated portion
	/// of size `round((1 - ratio) * C)` and an uncoordinated local portion
	/// of the remainder.
	pub fn reserve_local_cache(&mut self, ratio: f64) -> Result<(), NetworkError> {
		if self.simulation_started {
			return Err(NetworkError::ReservationAfterStart);
		}

		if !(0.0..=1.0).contains(&ratio) {
			return Err(NetworkError::InvalidReservationRatio);
		}

		let nodes: Vec<NodeId> = self.cache_capacities.keys().copied().collect();

		for node in nodes {
			let capacity = self.cache_capacities[&node];
			let factory = Arc::clone(&self.cache_factories[&node]);

			let coordinated_capacity = ((1.0 - ratio) * capacity as f64).round() as usize;
			let local_capacity = capacity - coordinated_capacity;

			self.caches.insert(node, factory(coordinated_capacity));
			self.local_caches.insert(node, factory(local_capacity));
		}

		Ok(())
	}

	#[must_use]
	pub fn topology(&self) -> &Topology<C> {
		&self.topology
	}

	#[must_use]
	pub fn shortest_paths_from(&self, node: NodeId) -> Option<&ShortestPaths> {
		self.shortest_paths.get(&node)
	}

	#[must_use]
	pub fn all_shortest_paths(&self) -> &FxHashMap<NodeId, ShortestPaths> {
		&self.shortest_paths
	}

	#[must_use]
	pub fn has_cache(&self, node: NodeId) -> bool {
		self.caches.contains_key(&node)
	}

	#[must_use]
	pub fn has_local_cache(&self, node: NodeId) -> bool {
		self.local_caches.contains_key(&node)
	}

	pub(crate) fn cache(&self, node: NodeId) -> Option<&Box<dyn Cache<C>>> {
		self.caches.get(&node)
	}

	pub(crate) fn cache_mut(&mut self, node: NodeId) -> Option<&mut Box<dyn Cache<C>>> {
		self.caches.get_mut(&node)
	}

	pub(crate) fn local_cache(&self, node: NodeId) -> Option<&Box<dyn Cache<C>>> {
		self.local_caches.get(&node)
	}

	pub(crate) fn local_cache_mut(&mut self, node: NodeId) -> Option<&mut Box<dyn Cache<C>>> {
		self.local_caches.get_mut(&node)
	}

	#[must_use]
	pub fn cache_capacity(&self, node: NodeId) -> Option<usize> {
		self.caches.get(&node).map(|cache| cache.capacity())
	}
}
