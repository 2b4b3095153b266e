/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::network::NetworkError;

pub type NodeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
	Internal,
	External,
}

#[derive(Debug, Clone)]
pub enum NodeRole<C> {
	Source { contents: FxHashSet<C> },
	Receiver,
	Router { cache_capacity: Option<usize> },
}

impl<C> NodeRole<C> {
	#[must_use]
	pub fn is_cache_capable(&self) -> bool {
		matches!(self, NodeRole::Router { cache_capacity: Some(_) })
	}
}

#[derive(Debug, Clone, Copy)]
struct Edge {
	delay: f64,
	link_type: LinkType,
}

/// Undirected graph of routers, sources, and receivers, with per-edge
/// delay and link type. Shortest paths are computed on demand via
/// Dijkstra over delay; [`crate::network::NetworkModel`] caches the
/// all-pairs table once at construction.
pub struct Topology<C>
where
	C: Eq + Hash + Clone + Debug,
{
	roles: FxHashMap<NodeId, NodeRole<C>>,
	adjacency: FxHashMap<NodeId, Vec<NodeId>>,
	edges: FxHashMap<(NodeId, NodeId), Edge>,
	clusters: Vec<FxHashSet<NodeId>>,
	node_cluster: FxHashMap<NodeId, usize>,
}

impl<C> Topology<C>
where
	C: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new() -> Self {
		Topology {
			roles: FxHashMap::default(),
			adjacency: FxHashMap::default(),
			edges: FxHashMap::default(),
			clusters: Vec::new(),
			node_cluster: FxHashMap::default(),
		}
	}

	pub fn add_node(&mut self, node: NodeId, role: NodeRole<C>) {
		self.roles.insert(node, role);
		self.adjacency.entry(node).or_default();
	}

	pub fn add_edge(&mut self, u: NodeId, v: NodeId, delay: f64, link_type: LinkType) {
		self.adjacency.entry(u).or_default().push(v);
		self.adjacency.entry(v).or_default().push(u);

		let edge = Edge { delay, link_type };
		self.edges.insert((u, v), edge);
		self.edges.insert((v, u), edge);
	}

	pub fn set_clusters(&mut self, clusters: Vec<FxHashSet<NodeId>>) {
		self.node_cluster.clear();

		for (index, cluster) in clusters.iter().enumerate() {
			for &node in cluster {
				self.node_cluster.insert(node, index);
			}
		}

		self.clusters = clusters;
	}

	#[must_use]
	pub fn is_clustered(&self) -> bool {
		!self.clusters.is_empty()
	}

	#[must_use]
	pub fn cluster_of(&self, node: NodeId) -> Option<usize> {
		self.node_cluster.get(&node).copied()
	}

	#[must_use]
	pub fn cluster_members(&self, cluster: usize) -> Option<&FxHashSet<NodeId>> {
		self.clusters.get(cluster)
	}

	#[must_use]
	pub fn role(&self, node: NodeId) -> Option<&NodeRole<C>> {
		self.roles.get(&node)
	}

	pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.roles.keys().copied()
	}

	pub fn cache_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.roles
			.iter()
			.filter(|(_, role)| role.is_cache_capable())
			.map(|(&node, _)| node)
	}

	#[must_use]
	pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
		self.adjacency.get(&node).map_or(&[], Vec::as_slice)
	}

	#[must_use]
	pub fn delay(&self, u: NodeId, v: NodeId) -> Option<f64> {
		self.edges.get(&(u, v)).map(|edge| edge.delay)
	}

	#[must_use]
	pub fn link_type(&self, u: NodeId, v: NodeId) -> Option<LinkType> {
		self.edges.get(&(u, v)).map(|edge| edge.link_type)
	}

	#[must_use]
	pub fn content_source(&self, content: &C) -> Option<NodeId> {
		self.roles.iter().find_map(|(&node, role)| match role {
			NodeRole::Source { contents } if contents.contains(content) => Some(node),
			_ => None,
		})
	}

	/// Number of edges on the longest of all shortest paths in the graph.
	pub fn diameter(&self) -> Result<usize, NetworkError> {
		let mut diameter = 0;

		for node in self.nodes() {
			let paths = self.dijkstra_from(node);

			for other in self.nodes() {
				if other == node {
					continue;
				}

				let path = paths
					.path_to(other)
					.ok_or_else(|| NetworkError::Unreachable(format!("{node:?}"), format!("{other:?}")))?;

				diameter = diameter.max(path.len().saturating_sub(1));
			}
		}

		Ok(diameter)
	}

	/// Single-source shortest paths by cumulative edge delay (Dijkstra).
	#[must_use]
	pub fn dijkstra_from(&self, source: NodeId) -> ShortestPaths {
		let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
		let mut prev: FxHashMap<NodeId, NodeId> = FxHashMap::default();
		let mut heap = BinaryHeap::new();

		dist.insert(source, 0.0);
		heap.push(HeapEntry { cost: 0.0, node: source });

		while let Some(HeapEntry { cost, node }) = heap.pop() {
			if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
				continue;
			}

			for &neighbor in self.neighbors(node) {
				let edge_delay = self.delay(node, neighbor).unwrap_or(f64::INFINITY);
				let candidate = cost + edge_delay;

				if candidate < *dist.get(&neighbor).unwrap_or(&f64::INFINITY) {
					dist.insert(neighbor, candidate);
					prev.insert(neighbor, node);
					heap.push(HeapEntry { cost: candidate, node: neighbor });
				}
			}
		}

		ShortestPaths { source, dist, prev }
	}

	pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
		self.dijkstra_from(from).path_to(to)
	}

	/// Depth-first reachability check from an arbitrary node.
	#[must_use]
	pub fn is_connected(&self) -> bool {
		let Some(start) = self.nodes().next() else {
			return true;
		};

		let mut seen = FxHashSet::default();
		let mut stack = vec![start];

		while let Some(node) = stack.pop() {
			if !seen.insert(node) {
				continue;
			}

			for &neighbor in self.neighbors(node) {
				stack.push(neighbor);
			}
		}

		seen.len() == self.roles.len()
	}
}

impl<C> Default for Topology<C>
where
	C: Eq + Hash + Clone + Debug,
{
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Debug)]
struct HeapEntry {
	cost: f64,
	node: NodeId,
}

impl PartialEq for HeapEntry {
	fn eq(&self, other: &Self) -> bool {
		self.cost == other.cost
	}
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
	fn cmp(&self, other: &Self) -> Ordering {
		// reversed for a min-heap
		other.cost.partial_cmp(&self.cost).unwrap_or(Ordering::Equal)
	}
}

impl PartialOrd for HeapEntry {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

pub struct ShortestPaths {
	source: NodeId,
	dist: FxHashMap<NodeId, f64>,
	prev: FxHashMap<NodeId, NodeId>,
}

impl ShortestPaths {
	#[must_use]
	pub fn distance_to(&self, node: NodeId) -> Option<f64> {
		self.dist.get(&node).copied()
	}

	#[must_use]
	pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
		if target == self.source {
			return Some(vec![self.source]);
		}

		if !self.dist.contains_key(&target) {
			return None;
		}

		let mut path = vec![target];
		let mut current = target;

		while let Some(&node) = self.prev.get(&current) {
			path.push(node);
			current = node;

			if current == self.source {
				break;
			}
		}

		path.reverse();
		Some(path)
	}
}

/// Brandes' algorithm: betweenness centrality of every node, computed
/// over unweighted hop count (matching the source's default, unweighted
/// `nx.betweenness_centrality` usage).
#[must_use]
pub fn betweenness_centrality<C>(topology: &Topology<C>) -> FxHashMap<NodeId, f64>
where
	C: Eq + Hash + Clone + Debug,
{
	let mut centrality: FxHashMap<NodeId, f64> = topology.nodes().map(|n| (n, 0.0)).collect();

	for source in topology.nodes() {
		let mut stack = Vec::new();
		let mut predecessors: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
		let mut sigma: FxHashMap<NodeId, f64> = topology.nodes().map(|n| (n, 0.0)).collect();
		let mut dist: FxHashMap<NodeId, i64> = FxHashMap::default();

		sigma.insert(source, 1.0);
		dist.insert(source, 0);

		let mut queue = std::collections::VecDeque::new();
		queue.push_back(source);

		while let Some(v) = queue.pop_front() {
			stack.push(v);

			for &w in topology.neighbors(v) {
				if !dist.contains_key(&w) {
					dist.insert(w, dist[&v] + 1);
					queue.push_back(w);
				}

				if dist[&w] == dist[&v] + 1 {
					*sigma.get_mut(&w).unwrap() += sigma[&v];
					predecessors.entry(w).or_default().push(v);
				}
			}
		}

		let mut delta: FxHashMap<NodeId, f64> = topology.nodes().map(|n| (n, 0.0)).collect();

		while let Some(w) = stack.pop() {
			if let Some(preds) = predecessors.get(&w) {
				for &v in preds {
					let contribution = (sigma[&v] / sigma[&w]) * (1.0 + delta[&w]);
					*delta.get_mut(&v).unwrap() += contribution;
				}
			}

			if w != source {
				*centrality.get_mut(&w).unwrap() += delta[&w];
			}
		}
	}

	// undirected graph: every shortest path counted from both endpoints
	for value in centrality.values_mut() {
		*value /= 2.0;
	}

	centrality
}

#[cfg(test)]
mod tests {
	use super::*;

	fn line_topology() -> Topology<u32> {
		let mut topology = Topology::new();

		topology.add_node(0, NodeRole::Source { contents: FxHashSet::default() });
		topology.add_node(1, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(2, NodeRole::Router { cache_capacity: Some(4) });
		topology.add_node(3, NodeRole::Receiver);

		topology.add_edge(0, 1, 1.0, LinkType::Internal);
		topology.add_edge(1, 2, 1.0, LinkType::Internal);
		topology.add_edge(2, 3, 1.0, LinkType::External);

		topology
	}

	#[test]
	fn shortest_path_follows_the_line() {
		let topology = line_topology();
		assert_eq!(topology.shortest_path(0, 3), Some(vec![0, 1, 2, 3]));
	}

	#[test]
	fn shortest_path_prefers_lower_cumulative_delay() {
		let mut topology = Topology::<u32>::new();

		for node in 0..4 {
			topology.add_node(node, NodeRole::Router { cache_capacity: Some(1) });
		}

		topology.add_edge(0, 1, 10.0, LinkType::Internal);
		topology.add_edge(0, 2, 1.0, LinkType::Internal);
		topology.add_edge(2, 1, 1.0, LinkType::Internal);
		topology.add_edge(1, 3, 1.0, LinkType::Internal);

		assert_eq!(topology.shortest_path(0, 3), Some(vec![0, 2, 1, 3]));
	}

	#[test]
	fn diameter_of_a_line_is_its_edge_count() {
		let topology = line_topology();
		assert_eq!(topology.diameter().unwrap(), 3);
	}

	#[test]
	fn betweenness_centrality_peaks_at_the_middle_of_a_line() {
		let topology = line_topology();
		let centrality = betweenness_centrality(&topology);

		assert!(centrality[&1] > centrality[&0]);
		assert!(centrality[&2] > centrality[&3]);
	}

	#[test]
	fn disconnected_graph_is_detected() {
		let mut topology = Topology::<u32>::new();
		topology.add_node(0, NodeRole::Receiver);
		topology.add_node(1, NodeRole::Receiver);

		assert!(!topology.is_connected());
	}
}
