/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

pub mod controller;
pub mod error;
pub mod model;
pub mod session;
pub mod topology;
pub mod view;

pub use controller::NetworkController;
pub use error::NetworkError;
pub use model::NetworkModel;
pub use session::{Hop, Session};
pub use topology::{betweenness_centrality, LinkType, NodeId, NodeRole, ShortestPaths, Topology};
pub use view::NetworkView;
