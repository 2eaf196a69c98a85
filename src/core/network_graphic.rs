use crate::core::fields::{attribute_text, FieldIndex, ASSET_TYPE, GLOBAL_ID, OBJECT_ID};
use crate::core::labels::get_coded_label;
use crate::domain::geometry::Point;
use crate::domain::layer::LayerSchema;
use crate::domain::model::{
    FeatureAttributes, Graphic, NetworkGraphic, TraceLocation, TraceLocationType,
};
use crate::utils::error::{Result, UnetError};
use serde_json::Value;

/// One trace location per terminal, in terminal order, or a single
/// terminal-less location when there are none.
pub fn build_trace_locations(
    global_id: &str,
    percent_along: f64,
    location_type: TraceLocationType,
    is_filter_barrier: bool,
    terminal_ids: &[i64],
) -> Vec<TraceLocation> {
    let location = |terminal_id| TraceLocation {
        global_id: global_id.to_string(),
        is_filter_barrier,
        percent_along,
        terminal_id,
        location_type,
    };

    if terminal_ids.is_empty() {
        return vec![location(None)];
    }
    terminal_ids.iter().map(|&id| location(Some(id))).collect()
}

/// Builds the flag graphic and its trace locations for one feature.
/// Placement is computed by the caller and passed in as `percent_along`.
pub fn build_network_graphic(
    point: &Point,
    attributes: &FeatureAttributes,
    layer: &LayerSchema,
    percent_along: f64,
    location_type: TraceLocationType,
    is_filter_barrier: bool,
    terminal_ids: &[i64],
) -> Result<NetworkGraphic> {
    let index = FieldIndex::new(attributes);
    let global_id = match index.require_value(GLOBAL_ID)? {
        Value::Null => return Err(UnetError::missing_field(GLOBAL_ID.label)),
        value => attribute_text(value),
    };
    let asset_type_field = index.require_key(ASSET_TYPE)?;
    let object_id = attribute_text(index.require_value(OBJECT_ID)?);

    let label = match get_coded_label(attributes, asset_type_field, layer) {
        Some(coded) => format!("{} ({}) : {}", layer.title, coded, object_id),
        None => format!("{} : {}", layer.title, object_id),
    };

    let trace_locations = build_trace_locations(
        &global_id,
        percent_along,
        location_type,
        is_filter_barrier,
        terminal_ids,
    );

    Ok(NetworkGraphic {
        graphic: Graphic {
            geometry: point.clone(),
            attributes: attributes.clone(),
            layer_id: layer.layer_id,
        },
        layer_id: layer.layer_id,
        label: Some(label),
        trace_locations,
    })
}
