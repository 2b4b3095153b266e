/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
	#[error("node {0:?} is not part of the topology")]
	UnknownNode(String),

	#[error("no path exists between {0:?} and {1:?}")]
	Unreachable(String, String),

	#[error("content {0:?} has no registered source")]
	NoSource(String),

	#[error("node {0:?} has no cache")]
	NoCache(String),

	#[error("a session is already open")]
	SessionAlreadyOpen,

	#[error("no session is currently open")]
	NoSessionOpen,

	#[error("local cache reservation cannot be changed after simulation start")]
	ReservationAfterStart,

	#[error("local cache reservation ratio must be in [0, 1]")]
	InvalidReservationRatio,

	#[error("topology is not clustered")]
	NotClustered,

	#[error("topology must be connected")]
	Disconnected,
}
