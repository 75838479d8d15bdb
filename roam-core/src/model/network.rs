//! Road network storage: vertices, symmetric adjacency, and way metadata

use geo::Point;
use hashbrown::HashMap;
use log::info;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::model::components::{RoadEdge, RoadNode, Way};
use crate::model::geometry::{haversine_miles, initial_bearing_degrees};
use crate::{Error, NodeId, WayId};

/// Display name used for ways the extract left unnamed
pub const UNKNOWN_ROAD: &str = "unknown road";

/// Undirected road graph.
///
/// Mutated only during construction (`add_node` / `add_way` / `prune`);
/// every query method takes `&self`.
#[derive(Debug, Default)]
pub struct RoadNetwork {
    pub(crate) graph: UnGraph<RoadNode, RoadEdge>,
    node_indices: HashMap<NodeId, NodeIndex>,
    ways: HashMap<WayId, Way>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vertex. A repeated id keeps the first registration.
    pub fn add_node(&mut self, id: NodeId, lon: f64, lat: f64, name: Option<String>) {
        if self.node_indices.contains_key(&id) {
            return;
        }
        let index = self.graph.add_node(RoadNode {
            id,
            geometry: Point::new(lon, lat),
            name,
            ways: Vec::new(),
        });
        self.node_indices.insert(id, index);
    }

    /// Connect two vertices. Edges are symmetric and the call is idempotent.
    ///
    /// # Errors
    ///
    /// `NotFound` if either endpoint has not been registered.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), Error> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        let length = haversine_miles(self.graph[ia].geometry, self.graph[ib].geometry);
        // update_edge keeps repeated registrations from stacking parallel edges
        self.graph.update_edge(ia, ib, RoadEdge { length });
        Ok(())
    }

    /// Register a way: consecutive members become edges and every member
    /// records its membership.
    ///
    /// # Errors
    ///
    /// `NotFound` if the way references an unregistered vertex; nothing is
    /// recorded in that case.
    pub fn add_way(&mut self, way: Way) -> Result<(), Error> {
        let indices = way
            .nodes
            .iter()
            .map(|&id| self.index_of(id))
            .collect::<Result<Vec<_>, _>>()?;

        for pair in way.nodes.windows(2) {
            self.add_edge(pair[0], pair[1])?;
        }
        for index in indices {
            self.graph[index].ways.push(way.id);
        }
        self.ways.insert(way.id, way);
        Ok(())
    }

    /// Drop every vertex with no incident edge. Called exactly once, after
    /// all ways are loaded and before the spatial index is built.
    pub fn prune(&mut self) {
        let before = self.graph.node_count();
        self.graph
            .retain_nodes(|graph, index| graph.neighbors(index).next().is_some());
        // retain_nodes renumbers the survivors, so the id lookup is rebuilt
        self.node_indices = self
            .graph
            .node_indices()
            .map(|index| (self.graph[index].id, index))
            .collect();
        info!("Pruned {} isolated vertices", before - self.graph.node_count());
    }

    /// Ids of all vertices, in storage order
    pub fn vertices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().map(|node| node.id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Ids of all vertices adjacent to `v`
    ///
    /// # Errors
    ///
    /// `NotFound` if `v` is unknown.
    pub fn adjacent(&self, v: NodeId) -> Result<Vec<NodeId>, Error> {
        let index = self.index_of(v)?;
        Ok(self
            .graph
            .neighbors(index)
            .map(|neighbor| self.graph[neighbor].id)
            .collect())
    }

    /// Great-circle distance between two vertices in miles
    pub fn distance(&self, v: NodeId, w: NodeId) -> Result<f64, Error> {
        Ok(haversine_miles(self.node(v)?.geometry, self.node(w)?.geometry))
    }

    /// Initial bearing from `v` to `w` in degrees, within (-180, 180]
    pub fn bearing(&self, v: NodeId, w: NodeId) -> Result<f64, Error> {
        Ok(initial_bearing_degrees(
            self.node(v)?.geometry,
            self.node(w)?.geometry,
        ))
    }

    /// Display name of a way shared by `v` and `w`.
    ///
    /// The first shared way in membership-registration order wins, so
    /// repeated lookups are deterministic. An unnamed shared way resolves to
    /// [`UNKNOWN_ROAD`].
    ///
    /// # Errors
    ///
    /// `NoSharedWay` if the vertices lie on no common way, `NotFound` if
    /// either id is unknown.
    pub fn way_name(&self, v: NodeId, w: NodeId) -> Result<&str, Error> {
        let v_ways = &self.node(v)?.ways;
        let w_ways = &self.node(w)?.ways;
        for a in v_ways {
            for b in w_ways {
                if a == b {
                    let name = self.ways.get(a).and_then(|way| way.name.as_deref());
                    return Ok(name.unwrap_or(UNKNOWN_ROAD));
                }
            }
        }
        Err(Error::NoSharedWay(v, w))
    }

    pub fn lon(&self, v: NodeId) -> Result<f64, Error> {
        Ok(self.node(v)?.geometry.x())
    }

    pub fn lat(&self, v: NodeId) -> Result<f64, Error> {
        Ok(self.node(v)?.geometry.y())
    }

    /// Display name of the vertex itself, if the extract carried one
    pub fn node_name(&self, v: NodeId) -> Result<Option<&str>, Error> {
        Ok(self.node(v)?.name.as_deref())
    }

    pub fn node(&self, v: NodeId) -> Result<&RoadNode, Error> {
        let index = self.index_of(v)?;
        Ok(&self.graph[index])
    }

    pub(crate) fn index_of(&self, v: NodeId) -> Result<NodeIndex, Error> {
        self.node_indices.get(&v).copied().ok_or(Error::NotFound(v))
    }

    /// Vertex handles and coordinates for the index build, in storage order
    pub(crate) fn indexed_points(&self) -> impl Iterator<Item = (NodeIndex, Point<f64>)> + '_ {
        self.graph
            .node_indices()
            .map(|index| (index, self.graph[index].geometry))
    }
}
