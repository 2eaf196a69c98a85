//! Typed utility network data element: domain networks, their edge and
//! junction sources, asset groups, asset types and terminal configurations.
//!
//! Deserialized once from the service's data element JSON and checked by
//! [`NetworkSchema::validate`] before any resolver sees it.

use crate::utils::error::{Result, UnetError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSchema {
    #[serde(default)]
    pub domain_networks: Vec<DomainNetwork>,
    #[serde(default)]
    pub terminal_configurations: Vec<TerminalConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainNetwork {
    #[serde(default)]
    pub domain_network_name: String,
    #[serde(default)]
    pub edge_sources: Vec<NetworkSource>,
    #[serde(default)]
    pub junction_sources: Vec<NetworkSource>,
}

/// An edge or junction source; one feature layer participating in the network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSource {
    pub layer_id: i64,
    #[serde(default)]
    pub source_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<String>,
    #[serde(default)]
    pub utility_network_feature_class_usage_type: String,
    #[serde(default)]
    pub asset_groups: Vec<AssetGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroup {
    pub asset_group_code: i64,
    #[serde(default)]
    pub asset_group_name: String,
    #[serde(default)]
    pub asset_types: Vec<AssetType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetType {
    pub asset_type_code: i64,
    #[serde(default)]
    pub asset_type_name: String,
    #[serde(default)]
    pub is_terminal_configuration_supported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_configuration_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalConfiguration {
    pub terminal_configuration_id: i64,
    #[serde(default)]
    pub terminal_configuration_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traversability_model: Option<String>,
    #[serde(default)]
    pub terminals: Vec<Terminal>,
    #[serde(default)]
    pub valid_configuration_paths: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_configuration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    pub terminal_id: i64,
    #[serde(default)]
    pub terminal_name: String,
    #[serde(default)]
    pub is_upstream_terminal: bool,
}

impl NetworkSchema {
    /// Parses either a bare data element or a `queryDataElements` response
    /// (`{"layerDataElements": [{"dataElement": {...}}]}`), then validates it.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        if let Some(service_error) = value.get("error") {
            return Err(service_error_from_json(service_error));
        }

        let data_element = match value.get("layerDataElements") {
            Some(elements) => elements
                .as_array()
                .and_then(|elements| elements.first())
                .and_then(|element| element.get("dataElement"))
                .cloned()
                .ok_or_else(|| UnetError::schema("layerDataElements contains no dataElement"))?,
            None => value,
        };

        let schema: NetworkSchema = serde_json::from_value(data_element)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(content)?)
    }
}

pub(crate) fn service_error_from_json(error: &serde_json::Value) -> UnetError {
    UnetError::ServiceError {
        code: error.get("code").and_then(|c| c.as_i64()).unwrap_or(0),
        message: error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown service error")
            .to_string(),
        details: error
            .get("details")
            .and_then(|d| d.as_array())
            .map(|details| {
                details
                    .iter()
                    .filter_map(|d| d.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

impl Validate for NetworkSchema {
    fn validate(&self) -> Result<()> {
        for domain_network in &self.domain_networks {
            for (kind, sources) in [
                ("junction", &domain_network.junction_sources),
                ("edge", &domain_network.edge_sources),
            ] {
                let mut seen = HashSet::new();
                for source in sources {
                    if !seen.insert(source.layer_id) {
                        return Err(UnetError::schema(format!(
                            "Duplicate {} source layerId {} in domain network '{}'",
                            kind, source.layer_id, domain_network.domain_network_name
                        )));
                    }
                }
            }
        }

        let configuration_ids: HashSet<i64> = self
            .terminal_configurations
            .iter()
            .map(|tc| tc.terminal_configuration_id)
            .collect();
        if configuration_ids.len() != self.terminal_configurations.len() {
            tracing::warn!("Duplicate terminalConfigurationId values; the first one listed wins");
        }

        for domain_network in &self.domain_networks {
            let sources = domain_network
                .junction_sources
                .iter()
                .chain(domain_network.edge_sources.iter());
            for source in sources {
                for group in &source.asset_groups {
                    for asset_type in &group.asset_types {
                        if let Some(id) = asset_type.terminal_configuration_id {
                            if !configuration_ids.contains(&id) {
                                tracing::warn!(
                                    layer_id = source.layer_id,
                                    asset_group = group.asset_group_code,
                                    asset_type = asset_type.asset_type_code,
                                    "Asset type references unknown terminal configuration {}",
                                    id
                                );
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
