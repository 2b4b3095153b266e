/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! An information-centric network cache simulator: pluggable eviction
//! policies, caching strategies, and network topologies driven by an
//! event stream, with pluggable metric collectors over the result.

pub mod ordered_index;
pub use crate::ordered_index::OrderedIndex;

pub mod cache;
pub use crate::cache::{Cache, CacheError};

pub mod decorator;
pub use crate::decorator::{InsertAfterKHitsCache, KeyValCache, RandomInsertCache, TtlCache};

pub mod network;
pub use crate::network::{NetworkController, NetworkError, NetworkModel, NetworkView, NodeId, Topology};

pub mod collector;
pub use crate::collector::{Collector, CollectorProxy, CollectorResults, MetricValue};

pub mod strategy;
pub use crate::strategy::{Strategy, StrategyError};

pub mod config;
pub use crate::config::{CachePolicyConfig, CollectorConfig, StrategyConfig};

pub mod registry;
pub use crate::registry::{build_cache_policy, build_collector, build_strategy};

mod error;
pub use crate::error::RunnerError;

pub mod runner;
pub use crate::runner::{run_experiment, run_sweep, Event, ExperimentRunner};
