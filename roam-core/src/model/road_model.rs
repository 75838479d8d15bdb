//! Finished routing model: the pruned graph plus its spatial index

use geo::Point;
use petgraph::graph::NodeIndex;

use crate::index::KdTree;
use crate::model::RoadNetwork;
use crate::{Error, NodeId};

/// Immutable pairing of the road graph and the vertex index.
///
/// Built once by [`crate::loading::build_road_model`]; afterwards nothing
/// mutates it, so one model can serve any number of concurrent queries.
#[derive(Debug)]
pub struct RoadModel {
    pub network: RoadNetwork,
    pub index: KdTree,
}

impl RoadModel {
    /// Snap an arbitrary coordinate to the closest network vertex
    ///
    /// # Errors
    ///
    /// `EmptyIndex` if the model contains no vertices.
    pub fn closest(&self, lon: f64, lat: f64) -> Result<NodeId, Error> {
        let index = self.closest_index(lon, lat)?;
        Ok(self.network.graph[index].id)
    }

    pub(crate) fn closest_index(&self, lon: f64, lat: f64) -> Result<NodeIndex, Error> {
        self.index.nearest(Point::new(lon, lat))
    }
}
