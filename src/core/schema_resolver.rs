use crate::core::fields::{attribute_code, FieldIndex, ASSET_GROUP, ASSET_TYPE};
use crate::domain::model::{NetworkFeature, ResolvedAssetType};
use crate::domain::schema::{NetworkSchema, NetworkSource, TerminalConfiguration};
use crate::utils::error::{Result, UnetError};

/// Lookups against one borrowed schema snapshot. Holds nothing else, so a
/// resolver is cheap to create per call site.
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'s> {
    schema: &'s NetworkSchema,
}

impl<'s> SchemaResolver<'s> {
    pub fn new(schema: &'s NetworkSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s NetworkSchema {
        self.schema
    }

    /// Finds the asset type for a (layer, group, type) triple. Junction sources
    /// are searched before edge sources within each domain network, and the
    /// first hit wins. `None` means the schema has no entry.
    pub fn resolve_asset_type(
        &self,
        layer_id: i64,
        asset_group_code: i64,
        asset_type_code: i64,
    ) -> Option<ResolvedAssetType> {
        self.schema.domain_networks.iter().find_map(|domain_network| {
            domain_network
                .junction_sources
                .iter()
                .chain(domain_network.edge_sources.iter())
                .filter(|source| source.layer_id == layer_id)
                .find_map(|source| Self::match_in_source(source, asset_group_code, asset_type_code))
        })
    }

    fn match_in_source(
        source: &NetworkSource,
        asset_group_code: i64,
        asset_type_code: i64,
    ) -> Option<ResolvedAssetType> {
        let group = source
            .asset_groups
            .iter()
            .find(|group| group.asset_group_code == asset_group_code)?;
        let asset_type = group
            .asset_types
            .iter()
            .find(|asset_type| asset_type.asset_type_code == asset_type_code)?;

        Some(ResolvedAssetType {
            asset_type: asset_type.clone(),
            asset_group_name: group.asset_group_name.clone(),
            utility_network_feature_class_usage_type: source
                .utility_network_feature_class_usage_type
                .clone(),
        })
    }

    pub fn resolve_terminal_configuration(
        &self,
        terminal_configuration_id: i64,
    ) -> Option<&'s TerminalConfiguration> {
        self.schema
            .terminal_configurations
            .iter()
            .find(|tc| tc.terminal_configuration_id == terminal_configuration_id)
    }

    pub fn junction_layer_ids(&self) -> Vec<i64> {
        self.schema
            .domain_networks
            .iter()
            .flat_map(|dn| dn.junction_sources.iter().map(|s| s.layer_id))
            .collect()
    }

    pub fn edge_layer_ids(&self) -> Vec<i64> {
        self.schema
            .domain_networks
            .iter()
            .flat_map(|dn| dn.edge_sources.iter().map(|s| s.layer_id))
            .collect()
    }

    /// All network layer ids, junctions first.
    pub fn network_layer_ids(&self) -> Vec<i64> {
        let mut ids = self.junction_layer_ids();
        ids.extend(self.edge_layer_ids());
        ids
    }

    /// Terminal ids for a feature, in terminal configuration order. Features on
    /// edge layers never have terminals. Junction features need readable asset
    /// group and asset type attributes.
    pub fn collect_terminal_ids(&self, feature: &NetworkFeature) -> Result<Vec<i64>> {
        let junction_layer_ids = self.junction_layer_ids();
        self.collect_terminal_ids_in(feature, &junction_layer_ids)
    }

    /// Like [`collect_terminal_ids`](Self::collect_terminal_ids) but with the
    /// junction layer ids supplied by the caller, so a batch can flatten them
    /// once.
    pub fn collect_terminal_ids_in(
        &self,
        feature: &NetworkFeature,
        junction_layer_ids: &[i64],
    ) -> Result<Vec<i64>> {
        if !junction_layer_ids.contains(&feature.layer_id) {
            return Ok(Vec::new());
        }

        let index = FieldIndex::new(&feature.attributes);
        let asset_group_code = attribute_code(index.require_value(ASSET_GROUP)?);
        let asset_type_code = attribute_code(index.require_value(ASSET_TYPE)?);
        let (Some(asset_group_code), Some(asset_type_code)) = (asset_group_code, asset_type_code)
        else {
            tracing::debug!(
                layer_id = feature.layer_id,
                "Asset group or asset type is not an integer code; no terminals"
            );
            return Ok(Vec::new());
        };

        let Some(asset_type) =
            self.resolve_asset_type(feature.layer_id, asset_group_code, asset_type_code)
        else {
            tracing::debug!(
                layer_id = feature.layer_id,
                asset_group_code,
                asset_type_code,
                "No schema entry for feature"
            );
            return Ok(Vec::new());
        };

        let terminal_ids = asset_type
            .asset_type
            .terminal_configuration_id
            .and_then(|id| self.resolve_terminal_configuration(id))
            .map(|tc| tc.terminals.iter().map(|t| t.terminal_id).collect())
            .unwrap_or_default();

        Ok(terminal_ids)
    }
}

/// Resolves a terminal configuration or explains which one was missing.
pub fn require_terminal_configuration<'s>(
    resolver: &SchemaResolver<'s>,
    terminal_configuration_id: i64,
) -> Result<&'s TerminalConfiguration> {
    resolver
        .resolve_terminal_configuration(terminal_configuration_id)
        .ok_or_else(|| {
            UnetError::schema(format!(
                "Terminal configuration {} not found",
                terminal_configuration_id
            ))
        })
}
