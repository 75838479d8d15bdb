//! Spatial index over network vertices

mod kdtree;

pub use kdtree::KdTree;
