use crate::core::fields::{find_field_key, ASSET_TYPE};
use crate::core::labels::get_coded_label;
use crate::core::network_graphic::build_network_graphic;
use crate::core::placement::PlacementEngine;
use crate::core::schema_resolver::SchemaResolver;
use crate::domain::geometry::Point;
use crate::domain::layer::LayerSchema;
use crate::domain::model::{NetworkFeature, NetworkGraphic, PlacementResult, TraceLocationType};
use crate::domain::ports::GeometryEngine;
use crate::utils::error::Result;

/// Turns a feature and a flag point into trace inputs: terminals from the
/// schema, placement from the geometry engine, then the network graphic.
pub struct TraceInputBuilder<'a, G: GeometryEngine> {
    resolver: SchemaResolver<'a>,
    placement: &'a PlacementEngine<G>,
}

impl<'a, G: GeometryEngine> TraceInputBuilder<'a, G> {
    pub fn new(resolver: SchemaResolver<'a>, placement: &'a PlacementEngine<G>) -> Self {
        Self {
            resolver,
            placement,
        }
    }

    /// Terminals, percent-along and coded label for a flag on `feature`.
    /// Features without geometry, or with non-line geometry, sit at 0.
    pub async fn place(
        &self,
        feature: &NetworkFeature,
        layer: &LayerSchema,
        flag: &Point,
    ) -> Result<PlacementResult> {
        let terminal_ids = self.resolver.collect_terminal_ids(feature)?;

        let percent_along = match &feature.geometry {
            Some(geometry) => self.placement.compute_percent_along(geometry, flag).await?,
            None => 0.0,
        };

        let label = find_field_key(&feature.attributes, ASSET_TYPE.name)
            .and_then(|field| get_coded_label(&feature.attributes, field, layer));

        tracing::debug!(
            layer_id = feature.layer_id,
            terminals = terminal_ids.len(),
            percent_along,
            "Placed flag"
        );

        Ok(PlacementResult {
            percent_along,
            terminal_ids,
            label,
        })
    }

    pub async fn build(
        &self,
        feature: &NetworkFeature,
        layer: &LayerSchema,
        flag: &Point,
        location_type: TraceLocationType,
        is_filter_barrier: bool,
    ) -> Result<NetworkGraphic> {
        let placement = self.place(feature, layer, flag).await?;
        build_network_graphic(
            flag,
            &feature.attributes,
            layer,
            placement.percent_along,
            location_type,
            is_filter_barrier,
            &placement.terminal_ids,
        )
    }
}
