/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod cl4m;
mod edge;
mod hashrouting;
mod lcd;
mod lce;
mod no_cache;
mod nrr;
mod prob_cache;
mod rand_bernoulli;
mod rand_choice;

pub use cl4m::CacheLessForMore;
pub use edge::Edge;
pub use hashrouting::{
	HashroutingAsymmetric, HashroutingClustered, HashroutingEdgeCacheRatio, HashroutingHybridAm,
	HashroutingHybridSm, HashroutingMulticast, HashroutingOnPathCacheRatio, HashroutingSymmetric, RoutingMode,
};
pub use lcd::LeaveCopyDown;
pub use lce::LeaveCopyEverywhere;
pub use no_cache::NoCache;
pub use nrr::{Metacaching, NearestReplicaRouting};
pub use prob_cache::ProbCache;
pub use rand_bernoulli::RandomBernoulli;
pub use rand_choice::RandomChoice;

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use std::collections::hash_map::DefaultHasher;

use thiserror::Error;

use crate::network::{controller::NetworkController, error::NetworkError, topology::NodeId};

#[derive(Debug, Error)]
pub enum StrategyError {
	#[error(transparent)]
	Network(#[from] NetworkError),

	#[error("content {0:?} has no registered source")]
	NoSource(String),

	#[error("content was not found at its expected source")]
	SourceMiss,

	#[error("unsupported metacaching policy: {0:?}")]
	UnsupportedMetacaching(String),

	#[error("hash-routing requires at least one cache node")]
	NoCacheNodes,

	#[error("a receiver's proxy must itself be a cache node")]
	ProxyWithoutCache,

	#[error("cache ratio must be in [0, 1]")]
	InvalidCacheRatio,

	#[error("topology is not clustered")]
	NotClustered,
}

/// A policy object driving the controller for a single event. Strategies
/// hold no mutable network state of their own beyond precomputed,
/// topology-derived bookkeeping (hash assignments, centrality scores).
pub trait Strategy<C>
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
	) -> Result<(), StrategyError>;
}

/// Deterministic `content -> [0, n)` hash used by the hash-routing family
/// to pick an authoritative cache. Stable for a fixed content type and n,
/// satisfying the "authoritative cache is invariant under traffic" property.
pub(crate) fn hash_index<C: Hash>(content: &C, n: usize) -> usize {
	let mut hasher = DefaultHasher::new();
	content.hash(&mut hasher);
	(hasher.finish() % n as u64) as usize
}
