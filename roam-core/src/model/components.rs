//! Road network components - vertices, edges, and named ways

use geo::Point;

use crate::{NodeId, WayId};

/// Road graph vertex (an intersection or a shape point on a road)
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// Stable id from the source extract
    pub id: NodeId,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
    /// Display name, if the extract carries one
    pub name: Option<String>,
    /// Ways this node belongs to, in registration order
    pub ways: Vec<WayId>,
}

/// Road graph edge (one segment between adjacent vertices)
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// Segment length in miles
    pub length: f64,
}

/// Named, ordered run of vertices; consecutive members are adjacent
#[derive(Debug, Clone)]
pub struct Way {
    pub id: WayId,
    pub nodes: Vec<NodeId>,
    pub name: Option<String>,
}
