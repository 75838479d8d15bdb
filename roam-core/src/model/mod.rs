//! Data model for the road network
//!
//! Contains the graph storage, its geometric primitives, and the finished
//! routing model shared by all queries.

// Re-export of main modules
pub mod components;
pub mod geometry;
pub mod network;
pub mod road_model;

// Re-export of the main model structure
pub use road_model::RoadModel;

// Re-export of basic types for convenience
pub use components::{RoadEdge, RoadNode, Way};
pub use network::{RoadNetwork, UNKNOWN_ROAD};
