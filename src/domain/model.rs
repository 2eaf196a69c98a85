use crate::domain::geometry::{Geometry, Point};
use crate::domain::schema::AssetType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Feature attributes in the order the service returned them. Field name
/// casing varies between geodatabases.
pub type FeatureAttributes = Map<String, Value>;

/// A feature as handed over by the caller: its layer, attributes and shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFeature {
    pub layer_id: i64,
    #[serde(default)]
    pub attributes: FeatureAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

/// An asset type together with the names of the group and source it was found
/// under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAssetType {
    #[serde(flatten)]
    pub asset_type: AssetType,
    pub asset_group_name: String,
    pub utility_network_feature_class_usage_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraceLocationType {
    StartingPoint,
    Barrier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceLocation {
    pub global_id: String,
    pub is_filter_barrier: bool,
    pub percent_along: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_id: Option<i64>,
    #[serde(rename = "type")]
    pub location_type: TraceLocationType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    pub percent_along: f64,
    pub terminal_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The flag graphic: a copy of the point plus the attributes and layer it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graphic {
    pub geometry: Point,
    pub attributes: FeatureAttributes,
    pub layer_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkGraphic {
    pub graphic: Graphic,
    pub layer_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub trace_locations: Vec<TraceLocation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_location_rest_shape() {
        let location = TraceLocation {
            global_id: "{ABC}".to_string(),
            is_filter_barrier: false,
            percent_along: 0.25,
            terminal_id: None,
            location_type: TraceLocationType::StartingPoint,
        };
        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(
            value,
            json!({"globalId": "{ABC}", "isFilterBarrier": false, "percentAlong": 0.25, "type": "starting-point"})
        );
    }

    #[test]
    fn test_attributes_keep_insertion_order() {
        let attributes: FeatureAttributes =
            serde_json::from_str(r#"{"ObjectID": 1, "GLOBALID": "{X}", "assetgroup": 3}"#).unwrap();
        let keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ObjectID", "GLOBALID", "assetgroup"]);
    }
}
