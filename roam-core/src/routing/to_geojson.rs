//! Conversion of computed routes to `GeoJSON` for display and tooling

use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{Map, Value as JsonValue, json};

use crate::model::RoadModel;
use crate::routing::directions::{Instruction, route_directions};
use crate::{Error, NodeId};

/// Convert a path to a `FeatureCollection`: one LineString feature for the
/// geometry plus one properties-only feature per instruction.
///
/// # Errors
///
/// Same failure modes as [`route_directions`], plus `NotFound` for unknown
/// path vertices.
pub fn route_to_geojson(model: &RoadModel, path: &[NodeId]) -> Result<FeatureCollection, Error> {
    let network = &model.network;
    let instructions = route_directions(network, path)?;

    let mut coordinates = Vec::with_capacity(path.len());
    for &id in path {
        coordinates.push((network.lon(id)?, network.lat(id)?));
    }
    let linestring: LineString = coordinates.into();

    let mut features = Vec::with_capacity(instructions.len() + 1);
    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new((&linestring).into()),
        "properties": {
            "leg_type": "route",
            "instruction_count": instructions.len(),
            "total_miles": instructions.iter().map(|i| i.distance).sum::<f64>(),
        }
    });
    features.push(serde_json::from_value(value).unwrap());

    for (step, instruction) in instructions.iter().enumerate() {
        features.push(instruction_feature(step, instruction));
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn instruction_feature(step: usize, instruction: &Instruction) -> Feature {
    let mut properties = Map::new();
    properties.insert(
        "leg_type".to_string(),
        JsonValue::String("instruction".to_string()),
    );
    properties.insert("step".to_string(), JsonValue::from(step));
    properties.insert(
        "way".to_string(),
        JsonValue::String(instruction.way.clone()),
    );
    properties.insert("miles".to_string(), JsonValue::from(instruction.distance));
    properties.insert(
        "text".to_string(),
        JsonValue::String(instruction.to_string()),
    );

    Feature {
        bbox: None,
        geometry: None,
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn route_to_geojson_string(model: &RoadModel, path: &[NodeId]) -> Result<String, Error> {
    let collection = route_to_geojson(model, path)?;
    Ok(serde_json::to_string(&collection).unwrap_or_default())
}
