//! 2-D k-d tree over vertex coordinates
//!
//! Splits on longitude at even depths and latitude at odd depths. The tree
//! is filled once after pruning and never rebalanced, so its shape depends
//! on insertion order; query results do not.

use geo::Point;
use petgraph::graph::NodeIndex;

use crate::Error;
use crate::model::geometry::haversine_miles;

#[derive(Debug)]
struct KdNode {
    vertex: NodeIndex,
    point: Point<f64>,
    left: Option<Box<KdNode>>,
    right: Option<Box<KdNode>>,
}

/// Nearest-vertex index over the road network
#[derive(Debug, Default)]
pub struct KdTree {
    root: Option<Box<KdNode>>,
    len: usize,
}

/// Coordinate used to split at this depth: longitude when even, latitude
/// when odd
fn split_value(point: Point<f64>, depth: usize) -> f64 {
    if depth % 2 == 0 { point.x() } else { point.y() }
}

impl KdTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a vertex. Points that tie with a resident point on the split
    /// coordinate descend to the right, the same side as "greater".
    pub fn insert(&mut self, vertex: NodeIndex, point: Point<f64>) {
        let mut depth = 0;
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if split_value(node.point, depth) > split_value(point, depth) {
                &mut node.left
            } else {
                &mut node.right
            };
            depth += 1;
        }
        *slot = Some(Box::new(KdNode {
            vertex,
            point,
            left: None,
            right: None,
        }));
        self.len += 1;
    }

    /// Vertex with the smallest great-circle distance to `query`
    ///
    /// # Errors
    ///
    /// `EmptyIndex` if nothing has been inserted.
    pub fn nearest(&self, query: Point<f64>) -> Result<NodeIndex, Error> {
        let root = self.root.as_deref().ok_or(Error::EmptyIndex)?;
        let mut best = (root.vertex, haversine_miles(root.point, query));
        search(root, query, 0, &mut best);
        Ok(best.0)
    }
}

fn search(node: &KdNode, query: Point<f64>, depth: usize, best: &mut (NodeIndex, f64)) {
    let distance = haversine_miles(node.point, query);
    if distance < best.1 {
        *best = (node.vertex, distance);
    }

    let (near, far) = if split_value(node.point, depth) > split_value(query, depth) {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };

    if let Some(child) = near {
        search(child, query, depth + 1, best);
    }
    // The far subtree can only hold a better match if the splitting line
    // itself is closer than the best distance so far
    if let Some(child) = far {
        if axis_bound(node.point, query, depth) < best.1 {
            search(child, query, depth + 1, best);
        }
    }
}

/// Great-circle distance in miles from the query to the node's splitting
/// line, measured along the split axis
fn axis_bound(node_point: Point<f64>, query: Point<f64>, depth: usize) -> f64 {
    let projected = if depth % 2 == 0 {
        Point::new(node_point.x(), query.y())
    } else {
        Point::new(query.x(), node_point.y())
    };
    haversine_miles(projected, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn brute_force_nearest(points: &[Point<f64>], query: Point<f64>) -> f64 {
        points
            .iter()
            .map(|&p| haversine_miles(p, query))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn empty_index_reports_error() {
        let tree = KdTree::new();
        assert!(matches!(tree.nearest(Point::new(0.0, 0.0)), Err(Error::EmptyIndex)));
    }

    #[test]
    fn single_point_is_always_nearest() {
        let mut tree = KdTree::new();
        tree.insert(NodeIndex::new(0), Point::new(-122.26, 37.87));
        assert_eq!(
            tree.nearest(Point::new(-122.0, 38.0)).unwrap(),
            NodeIndex::new(0)
        );
    }

    #[test]
    fn duplicate_coordinates_are_handled() {
        let mut tree = KdTree::new();
        let p = Point::new(-122.26, 37.87);
        tree.insert(NodeIndex::new(0), p);
        tree.insert(NodeIndex::new(1), p);
        tree.insert(NodeIndex::new(2), Point::new(-122.27, 37.88));
        let found = tree.nearest(p).unwrap();
        assert!(found == NodeIndex::new(0) || found == NodeIndex::new(1));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn nearest_matches_brute_force_on_random_sets() {
        let mut rng = SmallRng::seed_from_u64(8231);
        let mut points: Vec<Point<f64>> = (0..300)
            .map(|_| {
                Point::new(
                    rng.gen_range(-122.30..-122.20),
                    rng.gen_range(37.85..37.90),
                )
            })
            .collect();
        // Duplicate coordinates must not confuse the search
        for i in 0..30 {
            let p = points[i * 7];
            points.push(p);
        }

        let mut tree = KdTree::new();
        for (i, &p) in points.iter().enumerate() {
            tree.insert(NodeIndex::new(i), p);
        }

        let queries: Vec<Point<f64>> = (0..120)
            .map(|_| {
                Point::new(
                    rng.gen_range(-122.35..-122.15),
                    rng.gen_range(37.80..37.95),
                )
            })
            .chain(points.iter().copied().take(40))
            .collect();

        for query in queries {
            let found = tree.nearest(query).unwrap();
            let found_distance = haversine_miles(points[found.index()], query);
            let best = brute_force_nearest(&points, query);
            assert_eq!(
                found_distance, best,
                "index returned {found_distance} but brute force found {best}"
            );
        }
    }
}
