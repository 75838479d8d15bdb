//! Core road-network routing engine
//!
//! Builds an immutable road graph from pre-filtered map extract records,
//! snaps arbitrary coordinates to the network through a k-d tree, and
//! answers shortest-path queries with turn-by-turn driving instructions.
//!
//! Construction is strictly sequential: nodes, then ways (which derive the
//! edges), then a one-time prune of unconnected vertices, then the spatial
//! index. The finished [`RoadModel`] is read-only and can be shared between
//! any number of concurrent queries; every query keeps its own scratch
//! state.

pub mod error;
pub mod index;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use index::KdTree;
pub use loading::{NodeRecord, WayRecord, build_road_model};
pub use model::{RoadModel, RoadNetwork, UNKNOWN_ROAD, Way};
pub use routing::{
    Direction, Instruction, RouteQuery, bulk_shortest_paths, route_directions, shortest_path,
};

/// Stable 64-bit vertex identifier from the source extract
pub type NodeId = i64;

/// Stable 64-bit way identifier from the source extract
pub type WayId = i64;
