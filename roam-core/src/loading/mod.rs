//! This module is responsible for turning pre-filtered map extract records
//! into the immutable routing model.

mod builder;

pub use builder::{NodeRecord, WayRecord, build_road_model};
