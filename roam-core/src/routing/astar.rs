use std::{cmp::Ordering, collections::BinaryHeap};

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::{graph::NodeIndex, visit::EdgeRef};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::RoadModel;
use crate::model::geometry::haversine_miles;
use crate::{Error, NodeId};

#[derive(Copy, Clone, PartialEq)]
struct State {
    priority: f64,
    node: NodeIndex,
}

impl Eq for State {}

// Min-heap by priority (reversed from standard Rust BinaryHeap). Priorities
// are sums of finite distances, so total_cmp never sees a NaN.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.total_cmp(&self.priority)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* shortest path between two arbitrary coordinates.
///
/// Both endpoints are snapped to their nearest network vertex first. The
/// great-circle distance to the destination orders the search; it never
/// exceeds the remaining road distance, so the result is optimal, and the
/// search degrades to Dijkstra's algorithm as the heuristic contribution
/// vanishes.
///
/// All search state lives in this invocation, keyed by vertex handle;
/// concurrent queries over one shared model never observe each other, and a
/// caller may abandon the query between heap pops without corrupting it.
///
/// # Errors
///
/// `EmptyIndex` if the model has no vertices, `Unreachable` if the snapped
/// endpoints lie in different components.
pub fn shortest_path(
    model: &RoadModel,
    start_lon: f64,
    start_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
) -> Result<Vec<NodeId>, Error> {
    let start = model.closest_index(start_lon, start_lat)?;
    let dest = model.closest_index(dest_lon, dest_lat)?;
    let graph = &model.network.graph;
    let dest_point = graph[dest].geometry;

    // Estimate capacity based on graph size (adjust as needed)
    let estimated_nodes = graph.node_count().min(1000);
    let mut dist_to: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut edge_to: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    // Start vertex has distance 0; everything else defaults to infinity
    dist_to.insert(start, 0.0);
    heap.push(State {
        priority: haversine_miles(graph[start].geometry, dest_point),
        node: start,
    });

    let mut reached = false;
    while let Some(State { node, .. }) = heap.pop() {
        // Stale entries from earlier relaxations are skipped, not removed
        if visited.contains(node.index()) {
            continue;
        }
        visited.insert(node.index());

        if node == dest {
            reached = true;
            break;
        }

        let here = dist_to.get(&node).copied().unwrap_or(f64::INFINITY);
        for edge in graph.edges(node) {
            let next = edge.target();
            let next_dist = here + edge.weight().length;

            // Add or update distance if better using Entry API
            match dist_to.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_dist);
                    edge_to.insert(next, node);
                    heap.push(State {
                        priority: next_dist + haversine_miles(graph[next].geometry, dest_point),
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_dist < *entry.get() {
                        *entry.get_mut() = next_dist;
                        edge_to.insert(next, node);
                        heap.push(State {
                            priority: next_dist
                                + haversine_miles(graph[next].geometry, dest_point),
                            node: next,
                        });
                    }
                }
            }
        }
    }

    if !reached {
        return Err(Error::Unreachable);
    }

    // Follow predecessors backward from the destination, then flip
    let mut path = vec![graph[dest].id];
    let mut current = dest;
    while current != start {
        match edge_to.get(&current) {
            Some(&previous) => {
                current = previous;
                path.push(graph[current].id);
            }
            None => return Err(Error::Unreachable),
        }
    }
    path.reverse();
    Ok(path)
}

/// One origin/destination pair for bulk routing
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RouteQuery {
    pub start_lon: f64,
    pub start_lat: f64,
    pub dest_lon: f64,
    pub dest_lat: f64,
}

/// Route many independent queries in parallel over one shared model.
/// Sound because queries share no mutable state.
pub fn bulk_shortest_paths(
    model: &RoadModel,
    queries: &[RouteQuery],
) -> Vec<Result<Vec<NodeId>, Error>> {
    queries
        .par_iter()
        .map(|query| {
            shortest_path(
                model,
                query.start_lon,
                query.start_lat,
                query.dest_lon,
                query.dest_lat,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{NodeRecord, WayRecord, build_road_model};
    use approx::assert_relative_eq;

    fn node(id: NodeId, lon: f64, lat: f64) -> NodeRecord {
        NodeRecord { id, lon, lat, name: None }
    }

    fn way(id: i64, nodes: Vec<NodeId>, name: &str) -> WayRecord {
        WayRecord { id, nodes, name: Some(name.to_string()) }
    }

    #[test]
    fn picks_the_unique_shortest_path() {
        // Two routes from 1 to 3: straight up the short street, or a long
        // detour through 4
        let model = build_road_model(
            vec![
                node(1, 0.0, 0.0),
                node(2, 0.0, 0.001),
                node(3, 0.0, 0.002),
                node(4, 0.01, 0.001),
            ],
            vec![
                way(100, vec![1, 2, 3], "Short St"),
                way(101, vec![1, 4, 3], "Long Rd"),
            ],
        )
        .unwrap();

        let path = shortest_path(&model, 0.0, 0.0, 0.0, 0.002).unwrap();
        assert_eq!(path, vec![1, 2, 3]);

        let total: f64 = path
            .windows(2)
            .map(|pair| model.network.distance(pair[0], pair[1]).unwrap())
            .sum();
        let expected = model.network.distance(1, 2).unwrap() + model.network.distance(2, 3).unwrap();
        assert_relative_eq!(total, expected, epsilon = 1e-12);
    }

    #[test]
    fn same_snapped_endpoint_yields_single_vertex_path() {
        let model = build_road_model(
            vec![node(1, 0.0, 0.0), node(2, 0.0, 0.001)],
            vec![way(100, vec![1, 2], "Loop St")],
        )
        .unwrap();

        let path = shortest_path(&model, 0.0001, 0.0, 0.0, -0.0001).unwrap();
        assert_eq!(path, vec![1]);
    }

    #[test]
    fn disconnected_components_are_unreachable() {
        let model = build_road_model(
            vec![
                node(1, 0.0, 0.0),
                node(2, 0.0, 0.001),
                node(3, 1.0, 1.0),
                node(4, 1.0, 1.001),
            ],
            vec![way(100, vec![1, 2], "West St"), way(101, vec![3, 4], "East St")],
        )
        .unwrap();

        let result = shortest_path(&model, 0.0, 0.0, 1.0, 1.0);
        assert!(matches!(result, Err(Error::Unreachable)));
    }

    #[test]
    fn bulk_routing_matches_single_queries() {
        let model = build_road_model(
            vec![node(1, 0.0, 0.0), node(2, 0.0, 0.001), node(3, 0.0, 0.002)],
            vec![way(100, vec![1, 2, 3], "Main St")],
        )
        .unwrap();

        let queries = [
            RouteQuery { start_lon: 0.0, start_lat: 0.0, dest_lon: 0.0, dest_lat: 0.002 },
            RouteQuery { start_lon: 0.0, start_lat: 0.002, dest_lon: 0.0, dest_lat: 0.0 },
        ];
        let results = bulk_shortest_paths(&model, &queries);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &vec![1, 2, 3]);
        assert_eq!(results[1].as_ref().unwrap(), &vec![3, 2, 1]);
    }
}
