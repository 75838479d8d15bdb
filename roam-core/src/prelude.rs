// Re-export key components
pub use crate::error::Error;
pub use crate::index::KdTree;
pub use crate::loading::{NodeRecord, WayRecord, build_road_model};
pub use crate::model::{RoadModel, RoadNetwork, UNKNOWN_ROAD, Way};
pub use crate::routing::{
    Direction, Instruction, RouteQuery, bulk_shortest_paths, route_directions, route_to_geojson,
    route_to_geojson_string, shortest_path,
};

// Core identifier types
pub use crate::NodeId;
pub use crate::WayId;
