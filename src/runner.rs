/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use log::error;
use rustc_hash::FxHashMap;

use crate::collector::{CollectorProxy, CollectorResults};
use crate::config::{CachePolicyConfig, CollectorConfig, StrategyConfig};
use crate::error::RunnerError;
use crate::network::{
	controller::NetworkController,
	model::NetworkModel,
	topology::{NodeId, Topology},
};
use crate::registry::{build_cache_policy, build_collector, build_strategy};
use crate::strategy::Strategy;

/// One request pulled from the event stream. `log = false` marks
/// warmup traffic, which the controller still drives through the
/// strategy but collectors ignore.
#[derive(Debug, Clone)]
pub struct Event<C> {
	pub time: f64,
	pub receiver: NodeId,
	pub content: C,
	pub log: bool,
}

/// Drives a single experiment: owns the network model and the
/// attached collectors, and feeds a strategy every event from an
/// event stream in order. Mirrors `exec_experiment`'s shape — no
/// per-event error recovery here; a mid-run failure aborts this
/// experiment and propagates to the caller.
pub struct ExperimentRunner<C>
where
	C: Eq + Hash + Clone + Debug,
{
	model: NetworkModel<C>,
	collectors: CollectorProxy<C>,
}

impl<C> ExperimentRunner<C>
where
	C: Eq + Hash + Clone + Debug,
{
	/// Builds the model from `topology`, installs `cache_policy` at
	/// every cache-capable node (sized per that node's own capacity),
	/// and attaches every named collector.
	pub fn new(
		topology: Topology<C>,
		cache_policy: &CachePolicyConfig,
		collectors: impl IntoIterator<Item = (String, CollectorConfig)>,
	) -> Result<Self, RunnerError>
	where
		C: 'static,
	{
		let collector_configs: Vec<(String, CollectorConfig)> = collectors.into_iter().collect();

		let mut proxy = CollectorProxy::new();

		for (name, config) in &collector_configs {
			proxy.attach(name.clone(), build_collector(config, &topology));
		}

		let cache_nodes: Vec<(NodeId, usize)> = topology
			.cache_nodes()
			.filter_map(|node| topology.role(node).and_then(|role| match role {
				crate::network::topology::NodeRole::Router { cache_capacity: Some(capacity) } => Some((node, *capacity)),
				_ => None,
			}))
			.collect();

		let mut model = NetworkModel::new(topology)?;

		for (node, capacity) in cache_nodes {
			let config = cache_policy.clone();
			model.install_cache(node, capacity, std::sync::Arc::new(move |c| build_cache_policy(&config).expect("cache policy config is valid")));
		}

		Ok(ExperimentRunner { model, collectors: proxy })
	}

	#[must_use]
	pub fn model(&self) -> &NetworkModel<C> {
		&self.model
	}

	/// Reserves a fraction of every node's cache for uncoordinated local
	/// caching, required before running events with
	/// [`crate::strategy::HashroutingEdgeCacheRatio`] or
	/// [`crate::strategy::HashroutingOnPathCacheRatio`]. Must be called
	/// before the first event.
	pub fn reserve_local_cache(&mut self, ratio: f64) -> Result<(), RunnerError> {
		let mut controller = NetworkController::new(&mut self.model, CollectorProxy::new());
		controller.reserve_local_cache(ratio)?;
		Ok(())
	}

	/// Feeds every event to `strategy` in order. Stops and propagates
	/// on the first event that fails.
	pub fn run(&mut self, strategy: &mut dyn Strategy<C>, events: impl IntoIterator<Item = Event<C>>) -> Result<(), RunnerError> {
		let mut controller = NetworkController::new(&mut self.model, std::mem::replace(&mut self.collectors, CollectorProxy::new()));

		let result = (|| {
			for event in events {
				strategy.process_event(&mut controller, event.time, event.receiver, event.content, event.log)?;
			}

			Ok(())
		})();

		self.collectors = controller.into_collectors();
		result
	}

	/// The aggregated results of every attached collector, keyed by
	/// collector name.
	#[must_use]
	pub fn results(&self) -> FxHashMap<String, CollectorResults> {
		self.collectors.results()
	}
}

/// Declarative construction of a whole experiment from configuration
/// records, then a single [`ExperimentRunner::run`].
pub fn run_experiment<C>(
	topology: Topology<C>,
	cache_policy: &CachePolicyConfig,
	collectors: Vec<(String, CollectorConfig)>,
	strategy_config: &StrategyConfig,
	edge_cache_ratio: Option<f64>,
	events: impl IntoIterator<Item = Event<C>>,
) -> Result<FxHashMap<String, CollectorResults>, RunnerError>
where
	C: Eq + Hash + Clone + Debug + 'static,
{
	let mut strategy = build_strategy(strategy_config, &topology)?;
	let mut runner = ExperimentRunner::new(topology, cache_policy, collectors)?;

	if let Some(ratio) = edge_cache_ratio {
		runner.reserve_local_cache(ratio)?;
	}

	runner.run(strategy.as_mut(), events)?;
	Ok(runner.results())
}

/// Runs a batch of experiments, catching and logging a per-experiment
/// [`RunnerError`] at `error` level rather than aborting the whole
/// sweep; a failed experiment's slot in the returned vector is `None`.
pub fn run_sweep<C>(
	experiments: impl IntoIterator<Item = (String, Topology<C>, CachePolicyConfig, Vec<(String, CollectorConfig)>, StrategyConfig, Option<f64>, Vec<Event<C>>)>,
) -> Vec<(String, Option<FxHashMap<String, CollectorResults>>)>
where
	C: Eq + Hash + Clone + Debug + 'static,
{
	experiments
		.into_iter()
		.map(|(name, topology, cache_policy, collectors, strategy_config, edge_cache_ratio, events)| {
			match run_experiment(topology, &cache_policy, collectors, &strategy_config, edge_cache_ratio, events) {
				Ok(results) => (name, Some(results)),
				Err(err) => {
					error!("experiment {name:?} failed: {err}");
					(name, None)
				}
			}
		})
		.collect()
}
