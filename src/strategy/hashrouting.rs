/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::network::{
	controller::NetworkController,
	error::NetworkError,
	topology::{NodeId, NodeRole, Topology},
};
use crate::strategy::{hash_index, Strategy, StrategyError};

/// The delivery scheme used once a hash-routing miss has been fetched
/// from source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMode {
	Symm,
	Asymm,
	Multicast,
}

/// Which clusters get a copy of content delivered across a cluster
/// boundary: every visited cluster (LCE) or only the receiver's own
/// (EDGE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterClusterRouting {
	Lce,
	Edge,
}

/// Shared bookkeeping for every hash-routing variant: the fixed set of
/// cache-capable nodes a content's hash selects among.
struct HashroutingCore {
	cache_nodes: Vec<NodeId>,
}

impl HashroutingCore {
	fn new<C>(topology: &Topology<C>) -> Result<Self, StrategyError>
	where
		C: Eq + Hash + Clone + Debug,
	{
		let cache_nodes: Vec<NodeId> = topology.cache_nodes().collect();

		if cache_nodes.is_empty() {
			return Err(StrategyError::NoCacheNodes);
		}

		Ok(HashroutingCore { cache_nodes })
	}

	fn authoritative_cache<C: Hash>(&self, content: &C) -> NodeId {
		self.cache_nodes[hash_index(content, self.cache_nodes.len())]
	}
}

/// Delivers `source -> cache` (inserting) `-> dest`, the SYMM shape
/// reused wherever a routing scheme falls back to plain symmetric
/// delivery.
fn deliver_symm<C>(controller: &mut NetworkController<C>, source: NodeId, cache: NodeId, dest: NodeId) -> Result<(), StrategyError>
where
	C: Eq + Hash + Clone + Debug,
{
	controller.forward_content_path(source, cache, None, true)?;
	controller.put_content(cache)?;
	controller.forward_content_path(cache, dest, None, true)?;
	Ok(())
}

/// The node where `source -> cache` and `source -> dest` shortest paths
/// diverge, or `cache` itself if one path is a prefix of the other.
fn fork_node<C>(controller: &NetworkController<C>, source: NodeId, cache: NodeId, dest_path: &[NodeId]) -> Result<NodeId, StrategyError>
where
	C: Eq + Hash + Clone + Debug,
{
	let cache_path = controller
		.view()
		.shortest_path(source, cache)
		.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{source:?}"), format!("{cache:?}"))))?;

	let mut fork = cache;

	for i in 1..cache_path.len().min(dest_path.len()) {
		if cache_path[i] != dest_path[i] {
			fork = cache_path[i - 1];
			break;
		}
	}

	Ok(fork)
}

fn deliver_multicast<C>(controller: &mut NetworkController<C>, source: NodeId, cache: NodeId, dest: NodeId) -> Result<(), StrategyError>
where
	C: Eq + Hash + Clone + Debug,
{
	let dest_path = controller
		.view()
		.shortest_path(source, dest)
		.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{source:?}"), format!("{dest:?}"))))?;

	if dest_path.contains(&cache) {
		controller.forward_content_path(source, cache, None, true)?;
		controller.forward_content_path(cache, dest, None, true)?;
	} else {
		let fork = fork_node(controller, source, cache, &dest_path)?;

		controller.forward_content_path(source, fork, None, true)?;
		controller.forward_content_path(fork, dest, None, true)?;
		controller.forward_content_path(fork, cache, None, false)?;
	}

	controller.put_content(cache)?;
	Ok(())
}

fn process_hashrouting<C>(
	core: &HashroutingCore,
	routing: RoutingMode,
	controller: &mut NetworkController<C>,
	time: f64,
	receiver: NodeId,
	content: C,
	log: bool,
) -> Result<(), StrategyError>
where
	C: Eq + Hash + Clone + Debug,
{
	let source = controller.view().content_source(&content).ok_or_else(|| StrategyError::NoSource(format!("{content:?}")))?;
	let cache = core.authoritative_cache(&content);

	controller.start_session(time, receiver, content, log)?;
	controller.forward_request_path(receiver, cache)?;

	if controller.get_content(cache)? {
		controller.forward_content_path(cache, receiver, None, true)?;
	} else {
		controller.forward_request_path(cache, source)?;

		if !controller.get_content(source)? {
			return Err(StrategyError::SourceMiss);
		}

		match routing {
			RoutingMode::Symm => deliver_symm(controller, source, cache, receiver)?,
			RoutingMode::Asymm => {
				let on_path = controller.view().shortest_path(source, receiver).is_some_and(|path| path.contains(&cache));

				if on_path {
					deliver_symm(controller, source, cache, receiver)?;
				} else {
					controller.forward_content_path(source, receiver, None, true)?;
				}
			}
			RoutingMode::Multicast => deliver_multicast(controller, source, cache, receiver)?,
		}
	}

	controller.end_session()?;
	Ok(())
}

/// Every request is hashed straight to its authoritative cache; on a
/// miss the response travels source -> cache (inserting) -> receiver.
pub struct HashroutingSymmetric {
	core: HashroutingCore,
}

impl HashroutingSymmetric {
	pub fn new<C>(topology: &Topology<C>) -> Result<Self, StrategyError>
	where
		C: Eq + Hash + Clone + Debug,
	{
		Ok(HashroutingSymmetric { core: HashroutingCore::new(topology)? })
	}
}

impl<C> Strategy<C> for HashroutingSymmetric
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
		process_hashrouting(&self.core, RoutingMode::Symm, controller, time, receiver, content, log)
	}
}

/// Like [`HashroutingSymmetric`], but skips the insertion and delivers
/// straight source -> receiver whenever the authoritative cache isn't
/// already on that shortest path.
pub struct HashroutingAsymmetric {
	core: HashroutingCore,
}

impl HashroutingAsymmetric {
	pub fn new<C>(topology: &Topology<C>) -> Result<Self, StrategyError>
	where
		C: Eq + Hash + Clone + Debug,
	{
		Ok(HashroutingAsymmetric { core: HashroutingCore::new(topology)? })
	}
}

impl<C> Strategy<C> for HashroutingAsymmetric
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
		process_hashrouting(&self.core, RoutingMode::Asymm, controller, time, receiver, content, log)
	}
}

/// Off-path misses fork the delivery at the last common node of
/// source->cache and source->receiver, sending the main copy to the
/// receiver and a side copy to the cache.
pub struct HashroutingMulticast {
	core: HashroutingCore,
}

impl HashroutingMulticast {
	pub fn new<C>(topology: &Topology<C>) -> Result<Self, StrategyError>
	where
		C: Eq + Hash + Clone + Debug,
	{
		Ok(HashroutingMulticast { core: HashroutingCore::new(topology)? })
	}
}

impl<C> Strategy<C> for HashroutingMulticast
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
		process_hashrouting(&self.core, RoutingMode::Multicast, controller, time, receiver, content, log)
	}
}

/// Asymmetric hash-routing, except an off-path miss still ships a side
/// copy to the cache whenever the detour is cheap enough relative to
/// the topology's diameter.
pub struct HashroutingHybridAm {
	core: HashroutingCore,
	max_stretch: f64,
	diameter: usize,
}

impl HashroutingHybridAm {
	pub fn new<C>(topology: &Topology<C>, max_stretch: f64) -> Result<Self, StrategyError>
	where
		C: Eq + Hash + Clone + Debug,
	{
		let core = HashroutingCore::new(topology)?;
		let diameter = topology.diameter()?;

		Ok(HashroutingHybridAm { core, max_stretch, diameter })
	}
}

impl<C> Strategy<C> for HashroutingHybridAm
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
		let source = controller.view().content_source(&content).ok_or_else(|| StrategyError::NoSource(format!("{content:?}")))?;
		let cache = self.core.authoritative_cache(&content);

		controller.start_session(time, receiver, content, log)?;
		controller.forward_request_path(receiver, cache)?;

		if controller.get_content(cache)? {
			controller.forward_content_path(cache, receiver, None, true)?;
		} else {
			controller.forward_request_path(cache, source)?;

			if !controller.get_content(source)? {
				return Err(StrategyError::SourceMiss);
			}

			let recv_path = controller
				.view()
				.shortest_path(source, receiver)
				.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{source:?}"), format!("{receiver:?}"))))?;

			if recv_path.contains(&cache) {
				deliver_symm(controller, source, cache, receiver)?;
			} else {
				controller.forward_content_path(source, receiver, None, true)?;

				let fork = fork_node(controller, source, cache, &recv_path)?;
				let detour = controller.view().shortest_path(fork, cache).map_or(usize::MAX, |path| path.len().saturating_sub(1));

				if (detour as f64) < self.max_stretch * self.diameter as f64 {
					controller.forward_content_path(fork, cache, None, false)?;
					controller.put_content(cache)?;
				}
			}
		}

		controller.end_session()?;
		Ok(())
	}
}

/// Picks whichever of SYMM or MULTICAST delivers in fewer hops on a
/// miss, breaking ties toward SYMM; either way the cache is populated.
pub struct HashroutingHybridSm {
	core: HashroutingCore,
}

impl HashroutingHybridSm {
	pub fn new<C>(topology: &Topology<C>) -> Result<Self, StrategyError>
	where
		C: Eq + Hash + Clone + Debug,
	{
		Ok(HashroutingHybridSm { core: HashroutingCore::new(topology)? })
	}
}

impl<C> Strategy<C> for HashroutingHybridSm
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
		let source = controller.view().content_source(&content).ok_or_else(|| StrategyError::NoSource(format!("{content:?}")))?;
		let cache = self.core.authoritative_cache(&content);

		controller.start_session(time, receiver, content, log)?;
		controller.forward_request_path(receiver, cache)?;

		if controller.get_content(cache)? {
			controller.forward_content_path(cache, receiver, None, true)?;
		} else {
			controller.forward_request_path(cache, source)?;

			if !controller.get_content(source)? {
				return Err(StrategyError::SourceMiss);
			}

			let hops = |a: NodeId, b: NodeId| controller.view().shortest_path(a, b).map_or(usize::MAX, |path| path.len().saturating_sub(1));

			let symm_cost = hops(source, cache).saturating_add(hops(cache, receiver));

			let recv_path = controller
				.view()
				.shortest_path(source, receiver)
				.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{source:?}"), format!("{receiver:?}"))))?;

			let multicast_cost = if recv_path.contains(&cache) {
				recv_path.len().saturating_sub(1)
			} else {
				let fork = fork_node(controller, source, cache, &recv_path)?;
				hops(source, fork).saturating_add(hops(fork, receiver)).saturating_add(hops(fork, cache))
			};

			if multicast_cost < symm_cost {
				deliver_multicast(controller, source, cache, receiver)?;
			} else {
				deliver_symm(controller, source, cache, receiver)?;
			}
		}

		controller.end_session()?;
		Ok(())
	}
}

/// A fraction of each cache's capacity is carved out as an
/// uncoordinated local cache at the receiver's proxy (its sole
/// neighbour). The proxy's local cache is always probed before
/// falling back to hash-routing between the proxy and the
/// authoritative cache.
pub struct HashroutingEdgeCacheRatio {
	core: HashroutingCore,
	routing: RoutingMode,
	edge_cache_ratio: f64,
	proxy: FxHashMap<NodeId, NodeId>,
}

impl HashroutingEdgeCacheRatio {
	pub fn new<C>(topology: &Topology<C>, routing: RoutingMode, edge_cache_ratio: f64) -> Result<Self, StrategyError>
	where
		C: Eq + Hash + Clone + Debug,
	{
		if !(0.0..=1.0).contains(&edge_cache_ratio) {
			return Err(StrategyError::InvalidCacheRatio);
		}

		let core = HashroutingCore::new(topology)?;
		let mut proxy = FxHashMap::default();

		for node in topology.nodes() {
			if !matches!(topology.role(node), Some(NodeRole::Receiver)) {
				continue;
			}

			let &first_neighbor = topology.neighbors(node).first().ok_or(StrategyError::ProxyWithoutCache)?;

			if !topology.role(first_neighbor).is_some_and(NodeRole::is_cache_capable) {
				return Err(StrategyError::ProxyWithoutCache);
			}

			proxy.insert(node, first_neighbor);
		}

		Ok(HashroutingEdgeCacheRatio { core, routing, edge_cache_ratio, proxy })
	}

	/// The fraction each cache reserves for the proxy's uncoordinated
	/// local cache; the runner reserves it via the controller before
	/// the first event, since construction here only sees the topology.
	#[must_use]
	pub fn edge_cache_ratio(&self) -> f64 {
		self.edge_cache_ratio
	}
}

impl<C> Strategy<C> for HashroutingEdgeCacheRatio
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
		let proxy = *self.proxy.get(&receiver).ok_or(StrategyError::ProxyWithoutCache)?;
		let cache = self.core.authoritative_cache(&content);
		let source = controller.view().content_source(&content).ok_or_else(|| StrategyError::NoSource(format!("{content:?}")))?;

		controller.start_session(time, receiver, content, log)?;
		controller.forward_request_hop(receiver, proxy, true)?;

		if proxy != cache {
			if controller.get_content_local_cache(proxy)? {
				controller.forward_content_hop(proxy, receiver, true)?;
				controller.end_session()?;
				return Ok(());
			}

			controller.forward_request_path(proxy, cache)?;
		}

		if controller.get_content(cache)? {
			controller.forward_content_path(cache, proxy, None, true)?;
		} else {
			controller.forward_request_path(cache, source)?;

			if !controller.get_content(source)? {
				return Err(StrategyError::SourceMiss);
			}

			match self.routing {
				RoutingMode::Symm => deliver_symm(controller, source, cache, proxy)?,
				RoutingMode::Asymm => {
					let on_path = controller.view().shortest_path(source, proxy).is_some_and(|path| path.contains(&cache));

					if on_path {
						deliver_symm(controller, source, cache, proxy)?;
					} else {
						controller.forward_content_path(source, proxy, None, true)?;
					}
				}
				RoutingMode::Multicast => deliver_multicast(controller, source, cache, proxy)?,
			}
		}

		if proxy != cache {
			controller.put_content_local_cache(proxy)?;
		}

		controller.forward_content_hop(proxy, receiver, true)?;
		controller.end_session()?;
		Ok(())
	}
}

/// Every node on the request path probes its local cache before
/// deferring to the authoritative cache; on the return, every
/// traversed node other than the authoritative cache populates its
/// local cache, and the authoritative cache populates its coordinated
/// cache.
pub struct HashroutingOnPathCacheRatio {
	core: HashroutingCore,
	on_path_cache_ratio: f64,
}

impl HashroutingOnPathCacheRatio {
	pub fn new<C>(topology: &Topology<C>, on_path_cache_ratio: f64) -> Result<Self, StrategyError>
	where
		C: Eq + Hash + Clone + Debug,
	{
		if !(0.0..=1.0).contains(&on_path_cache_ratio) {
			return Err(StrategyError::InvalidCacheRatio);
		}

		Ok(HashroutingOnPathCacheRatio { core: HashroutingCore::new(topology)?, on_path_cache_ratio })
	}

	#[must_use]
	pub fn on_path_cache_ratio(&self) -> f64 {
		self.on_path_cache_ratio
	}
}

impl<C> Strategy<C> for HashroutingOnPathCacheRatio
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
		let cache = self.core.authoritative_cache(&content);
		let source = controller.view().content_source(&content).ok_or_else(|| StrategyError::NoSource(format!("{content:?}")))?;
		let request_path = controller
			.view()
			.shortest_path(receiver, cache)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{receiver:?}"), format!("{cache:?}"))))?;

		controller.start_session(time, receiver, content, log)?;

		let mut serving_node = None;

		for window in request_path.windows(2) {
			let (u, v) = (window[0], window[1]);
			controller.forward_request_hop(u, v, true)?;

			if v != cache && controller.get_content_local_cache(v)? {
				serving_node = Some(v);
				break;
			}
		}

		let serving_node = match serving_node {
			Some(node) => node,
			None => {
				if !controller.get_content(cache)? {
					controller.forward_request_path(cache, source)?;

					if !controller.get_content(source)? {
						return Err(StrategyError::SourceMiss);
					}

					controller.forward_content_path(source, cache, None, true)?;
					controller.put_content(cache)?;
				}

				cache
			}
		};

		let return_path: Vec<NodeId> = controller
			.view()
			.shortest_path(serving_node, receiver)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{serving_node:?}"), format!("{receiver:?}"))))?;

		controller.forward_content_path(serving_node, receiver, Some(&return_path), true)?;

		if return_path.len() > 2 {
			for &node in &return_path[1..return_path.len() - 1] {
				if node != cache && controller.view().has_local_cache(node) {
					controller.put_content_local_cache(node)?;
				}
			}
		}

		controller.end_session()?;
		Ok(())
	}
}

/// Per-cluster hash-routing: each cluster has its own authoritative
/// cache for a content, selected by the cluster's own cache-node set.
/// A request walks the clusters along the node-level shortest path to
/// source, querying each visited cluster's authoritative cache in
/// turn before falling through to the source.
pub struct HashroutingClustered {
	intra: RoutingMode,
	inter: InterClusterRouting,
	cluster_caches: Vec<Vec<NodeId>>,
}

impl HashroutingClustered {
	pub fn new<C>(topology: &Topology<C>, intra: RoutingMode, inter: InterClusterRouting) -> Result<Self, StrategyError>
	where
		C: Eq + Hash + Clone + Debug,
	{
		if !topology.is_clustered() {
			return Err(StrategyError::NotClustered);
		}

		let mut cluster_caches = Vec::new();
		let mut cluster = 0;

		while let Some(members) = topology.cluster_members(cluster) {
			let mut caches: Vec<NodeId> =
				members.iter().copied().filter(|&node| topology.role(node).is_some_and(NodeRole::is_cache_capable)).collect();
			caches.sort_unstable();
			cluster_caches.push(caches);
			cluster += 1;
		}

		Ok(HashroutingClustered { intra, inter, cluster_caches })
	}

	fn authoritative_cache_in<C: Hash>(&self, cluster: usize, content: &C) -> Option<NodeId> {
		let caches = self.cluster_caches.get(cluster)?;

		if caches.is_empty() {
			return None;
		}

		Some(caches[hash_index(content, caches.len())])
	}
}

impl<C> Strategy<C> for HashroutingClustered
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
		let source = controller.view().content_source(&content).ok_or_else(|| StrategyError::NoSource(format!("{content:?}")))?;
		let path = controller
			.view()
			.shortest_path(receiver, source)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{receiver:?}"), format!("{source:?}"))))?;

		let mut clusters: Vec<usize> = Vec::new();

		for &node in &path {
			if let Some(c) = controller.view().cluster(node) {
				if clusters.last() != Some(&c) {
					clusters.push(c);
				}
			}
		}

		let authorities: Vec<Option<NodeId>> = clusters.iter().map(|&c| self.authoritative_cache_in(c, &content)).collect();

		controller.start_session(time, receiver, content, log)?;

		let mut position = receiver;
		let mut hit_index = None;

		for (i, &authority) in authorities.iter().enumerate() {
			let Some(authority) = authority else { continue };

			controller.forward_request_path(position, authority)?;
			position = authority;

			if controller.get_content(authority)? {
				hit_index = Some(i);
				break;
			}
		}

		let (serving_node, from_source) = match hit_index {
			Some(i) => (authorities[i].expect("hit index always names a cluster with an authority"), false),
			None => {
				controller.forward_request_path(position, source)?;

				if !controller.get_content(source)? {
					return Err(StrategyError::SourceMiss);
				}

				(source, true)
			}
		};

		let return_path: Vec<NodeId> = controller
			.view()
			.shortest_path(serving_node, receiver)
			.ok_or_else(|| StrategyError::Network(NetworkError::Unreachable(format!("{serving_node:?}"), format!("{receiver:?}"))))?;

		controller.forward_content_path(serving_node, receiver, Some(&return_path), true)?;

		// MULTICAST intra-cluster routing favours replicating at one extra
		// cluster even under an EDGE inter-cluster policy.
		let insert_upto = match (self.inter, self.intra) {
			(InterClusterRouting::Lce, _) => authorities.len(),
			(InterClusterRouting::Edge, RoutingMode::Multicast) => authorities.len().min(2),
			(InterClusterRouting::Edge, _) => authorities.len().min(1),
		};

		let visited_before_hit = hit_index.unwrap_or(authorities.len());

		for &authority in authorities.iter().take(insert_upto.min(visited_before_hit)).flatten() {
			controller.put_content(authority)?;
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
	use crate::network::{model::NetworkModel, topology::LinkType};
	use rustc_hash::FxHashSet;
	use std::sync::Arc;

	/// A 6-cycle with a chord: receiver at 1, content source at 4, and
	/// cache-capable routers at 0, 2, and 5.
	fn cycle_with_chord() -> Topology<u32> {
		let mut contents = FxHashSet::default();
		contents.insert(1u32);

		let mut topology: Topology<u32> = Topology::new();
		topology.add_node(0, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(1, NodeRole::Receiver);
		topology.add_node(2, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(3, NodeRole::Router { cache_capacity: None });
		topology.add_node(4, NodeRole::Source { contents });
		topology.add_node(5, NodeRole::Router { cache_capacity: Some(4) });

		for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)] {
			topology.add_edge(u, v, 1.0, LinkType::Internal);
		}
		topology.add_edge(0, 3, 4.0, LinkType::Internal);

		topology
	}

	#[test]
	fn symmetric_hashrouting_forwards_to_the_authoritative_cache_and_inserts_there() {
		let topology = cycle_with_chord();
		let mut model = NetworkModel::new(topology).unwrap();

		for node in [0, 2, 5] {
			model.install_cache(node, 4, Arc::new(|c| Box::new(LruCache::<u32>::new(c))));
		}

		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		let mut strategy = HashroutingSymmetric::new(controller.model().topology()).unwrap();
		strategy.process_event(&mut controller, 0.0, 1, 1, true).unwrap();

		assert!(!controller.is_session_open());
	}

	#[test]
	fn asymmetric_hashrouting_skips_insertion_when_the_cache_is_off_path() {
		let topology = cycle_with_chord();
		let mut model = NetworkModel::new(topology).unwrap();

		for node in [0, 2, 5] {
			model.install_cache(node, 4, Arc::new(|c| Box::new(LruCache::<u32>::new(c))));
		}

		let collectors: CollectorProxy<u32> = CollectorProxy::new();
		let mut controller = NetworkController::new(&mut model, collectors);

		let mut strategy = HashroutingAsymmetric::new(controller.model().topology()).unwrap();
		strategy.process_event(&mut controller, 0.0, 1, 1, true).unwrap();

		assert!(!controller.is_session_open());
	}

	#[test]
	fn construction_fails_with_no_cache_capable_nodes() {
		let mut contents = FxHashSet::default();
		contents.insert(1u32);

		let mut topology: Topology<u32> = Topology::new();
		topology.add_node(0, NodeRole::Receiver);
		topology.add_node(1, NodeRole::Source { contents });
		topology.add_edge(0, 1, 1.0, LinkType::Internal);

		assert!(matches!(HashroutingSymmetric::new(&topology).unwrap_err(), StrategyError::NoCacheNodes));
	}
}
