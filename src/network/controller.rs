/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Debug;
use std::hash::Hash;

use crate::cache::Cache;
use crate::collector::CollectorProxy;
use crate::network::{
	error::NetworkError,
	model::NetworkModel,
	session::{Hop, Session},
	topology::NodeId,
	view::NetworkView,
};

/// Carries session state and drives every mutating operation against a
/// [`NetworkModel`]: strategies never touch the model directly, only
/// through this controller.
pub struct NetworkController<'a, C>
where
	C: Eq + Hash + Clone + Debug,
{
	model: &'a mut NetworkModel<C>,
	collectors: CollectorProxy<C>,
	session: Option<Session<C>>,
}

impl<'a, C> NetworkController<'a, C>
where
	C: Eq + Hash + Clone + Debug,
{
	#[must_use]
	pub fn new(model: &'a mut NetworkModel<C>, collectors: CollectorProxy<C>) -> Self {
		NetworkController { model, collectors, session: None }
	}

	#[must_use]
	pub fn model(&self) -> &NetworkModel<C> {
		self.model
	}

	/// Builds a fresh read-only view over the model. Strategies call
	/// this for every read; the returned view's borrow ends as soon as
	/// the caller is done with it, leaving `self` free for the next
	/// mutating call.
	#[must_use]
	pub fn view(&self) -> NetworkView<'_, C> {
		NetworkView::new(self.model)
	}

	fn session_mut(&mut self) -> Result<&mut Session<C>, NetworkError> {
		self.session.as_mut().ok_or(NetworkError::NoSessionOpen)
	}

	pub fn start_session(
		&mut self,
		time: f64,
		receiver: NodeId,
		content: C,
		log: bool,
	) -> Result<(), NetworkError> {
		if self.session.is_some() {
			return Err(NetworkError::SessionAlreadyOpen);
		}

		self.model.mark_simulation_started();

		if log {
			self.collectors.session_start(time, receiver, &content);
		}

		self.session = Some(Session::new(time, receiver, content, log));
		Ok(())
	}

	pub fn forward_request_hop(&mut self, u: NodeId, v: NodeId, main_path: bool) -> Result<(), NetworkError> {
		let log = self.session_mut()?.log;

		self.session_mut()?.request_hops.push(Hop { from: u, to: v, main_path });

		if log {
			self.collectors.request_hop(u, v, main_path);
		}

		Ok(())
	}

	/// Walks the shortest path `u`→`v`, reporting each hop as a
	/// request hop on the main path.
	pub fn forward_request_path(&mut self, u: NodeId, v: NodeId) -> Result<(), NetworkError> {
		let path = self
			.model
			.shortest_paths_from(u)
			.and_then(|paths| paths.path_to(v))
			.ok_or_else(|| NetworkError::Unreachable(format!("{u:?}"), format!("{v:?}")))?;

		for window in path.windows(2) {
			self.forward_request_hop(window[0], window[1], true)?;
		}

		Ok(())
	}

	/// Returns true iff `v` is the current content's origin, or `v`'s
	/// cache reports a hit. Reports `server_hit`/`cache_hit` to
	/// collectors exactly once per session, on the first positive call.
	pub fn get_content(&mut self, v: NodeId) -> Result<bool, NetworkError> {
		let content = self.session_mut()?.content.clone();
		let is_source = matches!(
			self.model.topology().role(v),
			Some(crate::network::topology::NodeRole::Source { contents }) if contents.contains(&content)
		);

		if is_source {
			self.report_positive(v, true)?;
			return Ok(true);
		}

		let hit = self.model.cache_mut(v).is_some_and(|cache| cache.get(&content));

		if hit {
			self.report_positive(v, false)?;
		}

		Ok(hit)
	}

	fn report_positive(&mut self, v: NodeId, is_server: bool) -> Result<(), NetworkError> {
		let session = self.session_mut()?;
		let already_reported = session.hit_reported;

		if !already_reported {
			session.hit_reported = true;
			session.serving_node = Some(v);

			if is_server {
				session.cache_hit = false;
			} else {
				session.cache_hit = true;
				session.cache_hit_node = Some(v);
			}
		}

		let log = self.session_mut()?.log;

		if log && !already_reported {
			if is_server {
				self.collectors.server_hit(v);
			} else {
				self.collectors.cache_hit(v);
			}
		}

		Ok(())
	}

	/// Inserts the current content into `v`'s cache; a silent no-op if
	/// `v` has no cache.
	pub fn put_content(&mut self, v: NodeId) -> Result<(), NetworkError> {
		let content = self.session_mut()?.content.clone();

		if let Some(cache) = self.model.cache_mut(v) {
			cache.put(content);
		}

		Ok(())
	}

	pub fn get_content_local_cache(&mut self, v: NodeId) -> Result<bool, NetworkError> {
		let content = self.session_mut()?.content.clone();
		Ok(self.model.local_cache_mut(v).is_some_and(|cache| cache.get(&content)))
	}

	pub fn put_content_local_cache(&mut self, v: NodeId) -> Result<(), NetworkError> {
		let content = self.session_mut()?.content.clone();

		if let Some(cache) = self.model.local_cache_mut(v) {
			cache.put(content);
		}

		Ok(())
	}

	pub fn forward_content_hop(&mut self, u: NodeId, v: NodeId, main_path: bool) -> Result<(), NetworkError> {
		let log = self.session_mut()?.log;

		self.session_mut()?.response_hops.push(Hop { from: u, to: v, main_path });

		if log {
			self.collectors.content_hop(u, v, main_path);
		}

		Ok(())
	}

	/// Walks `path` (default: the shortest path `u`→`v`, since the
	/// topology's edges are undirected and symmetric) reporting each
	/// hop on the response side.
	pub fn forward_content_path(
		&mut self,
		u: NodeId,
		v: NodeId,
		path: Option<&[NodeId]>,
		main_path: bool,
	) -> Result<(), NetworkError> {
		let fallback;

		let path = match path {
			Some(path) => path,
			None => {
				fallback = self
					.model
					.shortest_paths_from(u)
					.and_then(|paths| paths.path_to(v))
					.ok_or_else(|| NetworkError::Unreachable(format!("{u:?}"), format!("{v:?}")))?;

				fallback.as_slice()
			}
		};

		for window in path.windows(2) {
			self.forward_content_hop(window[0], window[1], main_path)?;
		}

		Ok(())
	}

	pub fn reserve_local_cache(&mut self, ratio: f64) -> Result<(), NetworkError> {
		self.model.reserve_local_cache(ratio)
	}

	/// Closes the current session, emits `session_end` to collectors,
	/// and returns the finished session record.
	pub fn end_session(&mut self) -> Result<Session<C>, NetworkError> {
		let mut session = self.session.take().ok_or(NetworkError::NoSessionOpen)?;

		if !session.hit_reported {
			session.cache_hit = false;
		}

		if session.log {
			self.collectors.session_end(session.serving_node, session.cache_hit);
		}

		Ok(session)
	}

	#[must_use]
	pub fn is_session_open(&self) -> bool {
		self.session.is_some()
	}

	/// Reclaims the attached collector proxy, consuming the controller.
	/// Used by a runner that owns the collectors across several
	/// controller instances (one per experiment run).
	#[must_use]
	pub fn into_collectors(self) -> CollectorProxy<C> {
		self.collectors
	}
}
