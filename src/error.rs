/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use thiserror::Error;

pub use crate::cache::CacheError;
pub use crate::network::NetworkError;
pub use crate::strategy::StrategyError;

/// Top-level error returned by the experiment runner, wrapping the
/// per-layer errors of the components it drives.
#[derive(Debug, Error)]
pub enum RunnerError {
	#[error("cache error: {0}")]
	Cache(#[from] CacheError),

	#[error("network error: {0}")]
	Network(#[from] NetworkError),

	#[error("strategy error: {0}")]
	Strategy(#[from] StrategyError),
}
