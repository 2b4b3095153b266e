/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use crate::cache::{
	BeladyMinCache, Cache, CacheError, ClimbCache, FifoCache, InCacheLfuCache, LruCache, NullCache,
	PerfectLfuCache, RandomEvictionCache, SegmentedLruCache,
};
use crate::collector::{CacheHitRatioCollector, Collector, LatencyCollector, LinkLoadCollector, PathStretchCollector};
use crate::config::{CachePolicyConfig, CollectorConfig, InterClusterRoutingConfig, MetacachingConfig, RoutingModeConfig, StrategyConfig};
use crate::decorator::{InsertAfterKHitsCache, RandomInsertCache};
use crate::network::topology::Topology;
use crate::strategy::{
	CacheLessForMore, Edge, HashroutingAsymmetric, HashroutingClustered, HashroutingEdgeCacheRatio, HashroutingHybridAm,
	HashroutingHybridSm, HashroutingMulticast, HashroutingOnPathCacheRatio, HashroutingSymmetric, InterClusterRouting,
	LeaveCopyDown, LeaveCopyEverywhere, Metacaching, NearestReplicaRouting, NoCache, ProbCache, RandomBernoulli,
	RandomChoice, RoutingMode, Strategy, StrategyError,
};

/// Builds a boxed cache from a typed configuration record. Declarative
/// construction covers every base eviction policy plus the
/// random-insert and insert-after-k-hits decorators; `BeladyMinCache`
/// (needs a future trace), `TtlCache` (needs a time-source closure),
/// `KeyValCache` and `ArrayCache` (need runtime instances, not
/// serializable parameters) are built directly in code instead.
pub fn build_cache_policy<K>(config: &CachePolicyConfig) -> Result<Box<dyn Cache<K>>, CacheError>
where
	K: Eq + Hash + Clone + Debug + 'static,
{
	let cache: Box<dyn Cache<K>> = match config {
		CachePolicyConfig::Null => Box::new(NullCache::new()),
		CachePolicyConfig::Lru { capacity } => Box::new(LruCache::new(*capacity)),
		CachePolicyConfig::Slru { capacity, segments, allocation } => match allocation {
			Some(fractions) => Box::new(SegmentedLruCache::with_allocation(*capacity, fractions)),
			None => Box::new(SegmentedLruCache::new(*capacity, *segments)),
		},
		CachePolicyConfig::InCacheLfu { capacity } => Box::new(InCacheLfuCache::new(*capacity)),
		CachePolicyConfig::PerfectLfu { capacity } => Box::new(PerfectLfuCache::new(*capacity)),
		CachePolicyConfig::Fifo { capacity } => Box::new(FifoCache::new(*capacity)),
		CachePolicyConfig::Climb { capacity } => Box::new(ClimbCache::new(*capacity)),
		CachePolicyConfig::RandomEviction { capacity } => Box::new(RandomEvictionCache::new(*capacity)),
		CachePolicyConfig::RandomInsert { p, inner } => Box::new(RandomInsertCache::new(build_cache_policy(inner)?, *p)),
		CachePolicyConfig::InsertAfterKHits { k, memory, inner } => {
			Box::new(InsertAfterKHitsCache::new(build_cache_policy(inner)?, *k, *memory)?)
		}
	};

	Ok(cache)
}

/// Unused marker to keep `BeladyMinCache` imported for documentation
/// purposes without a declarative constructor path.
#[allow(dead_code)]
fn _belady_is_runtime_only<K: Eq + Hash + Clone + Debug>(capacity: usize, trace: Vec<K>) -> Result<BeladyMinCache<K>, CacheError> {
	BeladyMinCache::new(capacity, trace)
}

/// Builds a boxed strategy from a typed configuration record and the
/// topology it will run over (needed up front for hash-routing's
/// cache-node enumeration, CL4M's betweenness precomputation, and
/// hybrid-AM's diameter).
pub fn build_strategy<C>(config: &StrategyConfig, topology: &Topology<C>) -> Result<Box<dyn Strategy<C>>, StrategyError>
where
	C: Eq + Hash + Clone + Debug + 'static,
{
	let strategy: Box<dyn Strategy<C>> = match config {
		StrategyConfig::NoCache => Box::new(NoCache::new()),
		StrategyConfig::Edge => Box::new(Edge::new()),
		StrategyConfig::Lce => Box::new(LeaveCopyEverywhere::new()),
		StrategyConfig::Lcd => Box::new(LeaveCopyDown::new()),
		StrategyConfig::ProbCache { t_tw } => Box::new(ProbCache::with_t_tw(*t_tw)),
		StrategyConfig::Cl4m => Box::new(CacheLessForMore::new(topology)),
		StrategyConfig::RandChoice => Box::new(RandomChoice::new()),
		StrategyConfig::RandBernoulli { p } => Box::new(RandomBernoulli::with_probability(*p)),
		StrategyConfig::Nrr { metacaching } => Box::new(NearestReplicaRouting::new(metacaching_of(*metacaching))),
		StrategyConfig::HashroutingSymmetric => Box::new(HashroutingSymmetric::new(topology)?),
		StrategyConfig::HashroutingAsymmetric => Box::new(HashroutingAsymmetric::new(topology)?),
		StrategyConfig::HashroutingMulticast => Box::new(HashroutingMulticast::new(topology)?),
		StrategyConfig::HashroutingHybridAm { max_stretch } => Box::new(HashroutingHybridAm::new(topology, *max_stretch)?),
		StrategyConfig::HashroutingHybridSm => Box::new(HashroutingHybridSm::new(topology)?),
		StrategyConfig::HashroutingEdgeCacheRatio { routing, edge_cache_ratio } => {
			Box::new(HashroutingEdgeCacheRatio::new(topology, routing_mode_of(*routing), *edge_cache_ratio)?)
		}
		StrategyConfig::HashroutingOnPathCacheRatio { on_path_cache_ratio } => {
			Box::new(HashroutingOnPathCacheRatio::new(topology, *on_path_cache_ratio)?)
		}
		StrategyConfig::HashroutingClustered { intra, inter } => {
			Box::new(HashroutingClustered::new(topology, routing_mode_of(*intra), inter_cluster_routing_of(*inter))?)
		}
	};

	Ok(strategy)
}

fn routing_mode_of(config: RoutingModeConfig) -> RoutingMode {
	match config {
		RoutingModeConfig::Symm => RoutingMode::Symm,
		RoutingModeConfig::Asymm => RoutingMode::Asymm,
		RoutingModeConfig::Multicast => RoutingMode::Multicast,
	}
}

fn metacaching_of(config: MetacachingConfig) -> Metacaching {
	match config {
		MetacachingConfig::Lce => Metacaching::Lce,
		MetacachingConfig::Lcd => Metacaching::Lcd,
	}
}

fn inter_cluster_routing_of(config: InterClusterRoutingConfig) -> InterClusterRouting {
	match config {
		InterClusterRoutingConfig::Lce => InterClusterRouting::Lce,
		InterClusterRoutingConfig::Edge => InterClusterRouting::Edge,
	}
}

/// Builds a boxed collector from a typed configuration record and the
/// topology it runs over (needed up front to snapshot per-link
/// type/delay and per-node shortest paths, both immutable for the run).
pub fn build_collector<C>(config: &CollectorConfig, topology: &Topology<C>) -> Box<dyn Collector<C>>
where
	C: Eq + Hash + Clone + Debug + 'static,
{
	match config {
		CollectorConfig::CacheHitRatio => Box::new(CacheHitRatioCollector::new()),
		CollectorConfig::LinkLoad { request_size, content_size } => {
			Box::new(LinkLoadCollector::new(topology, *request_size, *content_size))
		}
		CollectorConfig::Latency => Box::new(LatencyCollector::new(topology)),
		CollectorConfig::PathStretch => Box::new(PathStretchCollector::new(topology)),
	}
}
