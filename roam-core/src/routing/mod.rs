//! Shortest-path search and turn-by-turn directions

mod astar;
mod directions;
mod to_geojson;

pub use astar::{RouteQuery, bulk_shortest_paths, shortest_path};
pub use directions::{Direction, Instruction, route_directions};
pub use to_geojson::{route_to_geojson, route_to_geojson_string};
