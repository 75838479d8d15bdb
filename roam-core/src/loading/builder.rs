use log::info;
use serde::{Deserialize, Serialize};

use crate::index::KdTree;
use crate::model::{RoadModel, RoadNetwork, Way};
use crate::{Error, NodeId, WayId};

/// One navigable vertex as supplied by the extract pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub lon: f64,
    pub lat: f64,
    pub name: Option<String>,
}

/// One navigable way; consecutive members become graph edges. Way-type
/// filtering (which raw ways are drivable) happened upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WayRecord {
    pub id: WayId,
    pub nodes: Vec<NodeId>,
    pub name: Option<String>,
}

/// Builds the routing model from extract records.
///
/// Runs strictly in sequence: vertices, then ways (which derive the edges),
/// then the one-time prune of unconnected vertices, then the spatial index
/// over everything that survived. No query is possible before this returns,
/// and nothing mutates the model afterwards.
///
/// The index is filled in the graph's post-prune storage order; its shape
/// (not its results) depends on that order.
///
/// # Errors
///
/// Returns an error if a way references a node id missing from `nodes`.
pub fn build_road_model(
    nodes: Vec<NodeRecord>,
    ways: Vec<WayRecord>,
) -> Result<RoadModel, Error> {
    info!("Building road model from {} nodes and {} ways", nodes.len(), ways.len());

    let mut network = RoadNetwork::new();
    for node in nodes {
        network.add_node(node.id, node.lon, node.lat, node.name);
    }
    for way in ways {
        network.add_way(Way {
            id: way.id,
            nodes: way.nodes,
            name: way.name,
        })?;
    }

    network.prune();

    let mut index = KdTree::new();
    for (vertex, point) in network.indexed_points() {
        index.insert(vertex, point);
    }
    info!("Road model ready: {} routable vertices", index.len());

    Ok(RoadModel { network, index })
}
