/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use serde::{Deserialize, Serialize};

/// Typed, enumerated description of a cache policy/decorator stack, one
/// variant per concrete implementation, carrying only that
/// implementation's parameters. An external loader is responsible for
/// turning whatever on-disk shape it reads into one of these before
/// handing it to [`crate::registry::build_cache_policy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CachePolicyConfig {
	Null,
	Lru { capacity: usize },
	Slru { capacity: usize, segments: usize, allocation: Option<Vec<f64>> },
	InCacheLfu { capacity: usize },
	PerfectLfu { capacity: usize },
	Fifo { capacity: usize },
	Climb { capacity: usize },
	RandomEviction { capacity: usize },
	RandomInsert { p: f64, inner: Box<CachePolicyConfig> },
	InsertAfterKHits { k: u32, memory: Option<usize>, inner: Box<CachePolicyConfig> },
}

/// Sub-routing scheme a hash-routing variant delivers a miss under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingModeConfig {
	Symm,
	Asymm,
	Multicast,
}

/// Which metacaching policy nearest-replica routing applies on return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetacachingConfig {
	Lce,
	Lcd,
}

/// Which clusters a clustered hash-routing delivery populates across a
/// cluster boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterClusterRoutingConfig {
	Lce,
	Edge,
}

/// Typed, enumerated description of a strategy instantiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrategyConfig {
	NoCache,
	Edge,
	Lce,
	Lcd,
	ProbCache { t_tw: f64 },
	Cl4m,
	RandChoice,
	RandBernoulli { p: f64 },
	Nrr { metacaching: MetacachingConfig },
	HashroutingSymmetric,
	HashroutingAsymmetric,
	HashroutingMulticast,
	HashroutingHybridAm { max_stretch: f64 },
	HashroutingHybridSm,
	HashroutingEdgeCacheRatio { routing: RoutingModeConfig, edge_cache_ratio: f64 },
	HashroutingOnPathCacheRatio { on_path_cache_ratio: f64 },
	HashroutingClustered { intra: RoutingModeConfig, inter: InterClusterRoutingConfig },
}

/// Typed, enumerated description of a collector instantiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollectorConfig {
	CacheHitRatio,
	LinkLoad { request_size: f64, content_size: f64 },
	Latency,
	PathStretch,
}
