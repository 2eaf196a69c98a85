use crate::domain::geometry::{Geometry, LinearUnit, Point, Polyline};
use crate::domain::ports::GeometryEngine;
use crate::utils::error::{Result, UnetError};
use serde::{Deserialize, Serialize};

/// Placement used when the flag cannot be isolated on the line.
pub const NEUTRAL_PERCENT_ALONG: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOptions {
    /// Geodesic buffer radius around the snapped flag.
    pub buffer_distance: f64,
    pub buffer_unit: LinearUnit,
    /// Unit for the planar lengths that are compared.
    pub length_unit: LinearUnit,
    /// Turns the buffered line piece into a cutter across the line.
    pub rotation_degrees: f64,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            buffer_distance: 20.0,
            buffer_unit: LinearUnit::Feet,
            length_unit: LinearUnit::Feet,
            rotation_degrees: 90.0,
        }
    }
}

/// Computes percent-along values by splitting lines through a geometry engine.
///
/// Every step feeds the next, so the engine calls are awaited one at a time:
/// project, snap, buffer, intersect, rotate, cut, measure. Two outcomes fall
/// back to [`NEUTRAL_PERCENT_ALONG`] instead of failing: an empty buffer/line
/// intersection and a cut that yields no parts. Any engine error is returned
/// as is.
pub struct PlacementEngine<G: GeometryEngine> {
    engine: G,
    options: PlacementOptions,
}

impl<G: GeometryEngine> PlacementEngine<G> {
    pub fn new(engine: G) -> Self {
        Self::with_options(engine, PlacementOptions::default())
    }

    pub fn with_options(engine: G, options: PlacementOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> &PlacementOptions {
        &self.options
    }

    pub fn engine(&self) -> &G {
        &self.engine
    }

    /// Fraction of `line` that lies before `point`, in `[0, 1]`. Anything that
    /// is not a polyline sits at 0.
    pub async fn compute_percent_along(&self, line: &Geometry, point: &Point) -> Result<f64> {
        let Some(source_line) = line.as_polyline() else {
            tracing::debug!("{} has no percent-along; using 0", line.type_name());
            return Ok(0.0);
        };

        let parts = self.split_polyline(source_line, point).await?;
        if parts.is_empty() {
            return Ok(NEUTRAL_PERCENT_ALONG);
        }

        let origin = source_line
            .first_coordinate()
            .ok_or_else(|| UnetError::geometry("cut", "source line has no coordinates"))?;

        // Exact comparison: reprojection drift can put the first part's start a
        // hair away from the source start, which picks the wrong part.
        let before = if parts[0].first_coordinate() == Some(origin) {
            &parts[0]
        } else {
            parts.get(1).ok_or_else(|| {
                UnetError::geometry(
                    "cut",
                    "single cut part does not start at the line origin",
                )
            })?
        };

        let unit = self.options.length_unit;
        let source_length = self.engine.planar_length(source_line, unit).await?;
        if source_length <= 0.0 {
            tracing::warn!("Source line has zero length; using 0");
            return Ok(0.0);
        }
        let before_length = self.engine.planar_length(before, unit).await?;

        let ratio = before_length / source_length;
        tracing::debug!(
            before_length,
            source_length,
            unit = unit.as_str(),
            "percent along {:.6}",
            ratio
        );
        Ok(ratio.clamp(0.0, 1.0))
    }

    /// Cuts `source_line` across the flag location. An empty result means the
    /// flag could not be isolated on the line.
    pub async fn split_polyline(&self, source_line: &Polyline, point: &Point) -> Result<Vec<Polyline>> {
        let projected = match &point.spatial_reference {
            Some(spatial_reference) => self.engine.project(source_line, spatial_reference).await?,
            None => source_line.clone(),
        };

        let snapped = self.snap(&projected, point).await?;
        tracing::debug!(x = snapped.x, y = snapped.y, "Snapped flag to line");

        let buffer = self
            .engine
            .geodesic_buffer(&snapped, self.options.buffer_distance, self.options.buffer_unit)
            .await?;

        let intersection = match self.engine.intersect(&projected, &buffer).await? {
            Some(geometry) if !geometry.is_empty() => geometry,
            _ => {
                tracing::warn!("Flag buffer does not intersect the line; using neutral placement");
                return Ok(Vec::new());
            }
        };

        let rotated = self
            .engine
            .rotate(&intersection, self.options.rotation_degrees)
            .await?;
        let rotated_type = rotated.type_name();
        let cutter = rotated.into_polyline().ok_or_else(|| {
            UnetError::geometry("rotate", format!("expected a polyline cutter, got {}", rotated_type))
        })?;

        let parts = self.engine.cut(&projected, &cutter).await?;
        if parts.is_empty() {
            tracing::warn!("Cutting the line produced no parts; using neutral placement");
        }
        Ok(parts)
    }

    async fn snap(&self, line: &Polyline, point: &Point) -> Result<Point> {
        let nearest = self.engine.nearest_coordinate(line, point).await?;
        nearest.coordinate.ok_or(UnetError::NoNearestCoordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::{NearestPointResult, Polygon, SpatialReference};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Replays canned answers and records which operations ran, in order.
    #[derive(Clone)]
    struct ScriptedEngine {
        nearest: Option<Point>,
        intersection: Option<Geometry>,
        rotated: Option<Geometry>,
        parts: Vec<Polyline>,
        fail_on: Option<&'static str>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ScriptedEngine {
        fn new() -> Self {
            Self {
                nearest: Some(Point::new(50.0, 0.0, None)),
                intersection: Some(line(vec![[30.0, 0.0], [70.0, 0.0]]).into()),
                rotated: None,
                parts: vec![
                    line(vec![[0.0, 0.0], [50.0, 0.0]]),
                    line(vec![[50.0, 0.0], [100.0, 0.0]]),
                ],
                fail_on: None,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        async fn record(&self, op: &'static str) -> Result<()> {
            self.calls.lock().await.push(op);
            if self.fail_on == Some(op) {
                return Err(UnetError::geometry(op, "service unavailable"));
            }
            Ok(())
        }

        async fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().await.clone()
        }
    }

    fn line(path: Vec<[f64; 2]>) -> Polyline {
        Polyline {
            paths: vec![path],
            spatial_reference: None,
        }
    }

    fn path_length(line: &Polyline) -> f64 {
        line.paths
            .iter()
            .flat_map(|path| path.windows(2))
            .map(|w| ((w[1][0] - w[0][0]).powi(2) + (w[1][1] - w[0][1]).powi(2)).sqrt())
            .sum()
    }

    #[async_trait]
    impl GeometryEngine for ScriptedEngine {
        async fn project(&self, line: &Polyline, sr: &SpatialReference) -> Result<Polyline> {
            self.record("project").await?;
            let mut projected = line.clone();
            projected.spatial_reference = Some(sr.clone());
            Ok(projected)
        }

        async fn nearest_coordinate(&self, _line: &Polyline, _point: &Point) -> Result<NearestPointResult> {
            self.record("nearest_coordinate").await?;
            Ok(NearestPointResult {
                coordinate: self.nearest.clone(),
                distance: 0.0,
                is_empty: self.nearest.is_none(),
            })
        }

        async fn geodesic_buffer(&self, point: &Point, distance: f64, unit: LinearUnit) -> Result<Polygon> {
            self.record("geodesic_buffer").await?;
            assert_eq!(distance, 20.0);
            assert_eq!(unit, LinearUnit::Feet);
            Ok(Polygon {
                rings: vec![vec![[point.x - distance, point.y], [point.x + distance, point.y]]],
                spatial_reference: None,
            })
        }

        async fn intersect(&self, _line: &Polyline, _polygon: &Polygon) -> Result<Option<Geometry>> {
            self.record("intersect").await?;
            Ok(self.intersection.clone())
        }

        async fn rotate(&self, geometry: &Geometry, degrees: f64) -> Result<Geometry> {
            self.record("rotate").await?;
            assert_eq!(degrees, 90.0);
            Ok(self.rotated.clone().unwrap_or_else(|| geometry.clone()))
        }

        async fn cut(&self, _line: &Polyline, _cutter: &Polyline) -> Result<Vec<Polyline>> {
            self.record("cut").await?;
            Ok(self.parts.clone())
        }

        async fn planar_length(&self, line: &Polyline, unit: LinearUnit) -> Result<f64> {
            self.record("planar_length").await?;
            assert_eq!(unit, LinearUnit::Feet);
            Ok(path_length(line))
        }
    }

    fn source() -> Geometry {
        line(vec![[0.0, 0.0], [100.0, 0.0]]).into()
    }

    fn flag() -> Point {
        Point::new(50.0, 3.0, Some(SpatialReference::from_wkid(2230)))
    }

    #[tokio::test]
    async fn test_non_line_geometry_is_zero() {
        let engine = ScriptedEngine::new();
        let placement = PlacementEngine::new(engine.clone());
        let point_geometry: Geometry = Point::new(1.0, 1.0, None).into();
        assert_eq!(placement.compute_percent_along(&point_geometry, &flag()).await.unwrap(), 0.0);
        assert!(engine.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_runs_in_order() {
        let engine = ScriptedEngine::new();
        let placement = PlacementEngine::new(engine.clone());
        let percent = placement.compute_percent_along(&source(), &flag()).await.unwrap();
        assert_eq!(percent, 0.5);
        assert_eq!(
            engine.calls().await,
            vec![
                "project",
                "nearest_coordinate",
                "geodesic_buffer",
                "intersect",
                "rotate",
                "cut",
                "planar_length",
                "planar_length"
            ]
        );
    }

    #[tokio::test]
    async fn test_second_part_used_when_first_is_not_anchored() {
        let mut engine = ScriptedEngine::new();
        engine.parts = vec![
            line(vec![[25.0, 0.0], [100.0, 0.0]]),
            line(vec![[0.0, 0.0], [25.0, 0.0]]),
        ];
        let placement = PlacementEngine::new(engine);
        let percent = placement.compute_percent_along(&source(), &flag()).await.unwrap();
        assert_eq!(percent, 0.25);
    }

    #[tokio::test]
    async fn test_empty_intersection_is_neutral() {
        let mut engine = ScriptedEngine::new();
        engine.intersection = None;
        let placement = PlacementEngine::new(engine.clone());
        let percent = placement.compute_percent_along(&source(), &flag()).await.unwrap();
        assert_eq!(percent, NEUTRAL_PERCENT_ALONG);
        assert!(!engine.calls().await.contains(&"rotate"));
    }

    #[tokio::test]
    async fn test_empty_geometry_intersection_is_neutral() {
        let mut engine = ScriptedEngine::new();
        engine.intersection = Some(Polyline { paths: vec![], spatial_reference: None }.into());
        let placement = PlacementEngine::new(engine);
        assert_eq!(placement.compute_percent_along(&source(), &flag()).await.unwrap(), 0.5);
    }

    #[tokio::test]
    async fn test_no_cut_parts_is_neutral() {
        let mut engine = ScriptedEngine::new();
        engine.parts = vec![];
        let placement = PlacementEngine::new(engine.clone());
        assert_eq!(placement.compute_percent_along(&source(), &flag()).await.unwrap(), 0.5);
        assert!(!engine.calls().await.contains(&"planar_length"));
    }

    #[tokio::test]
    async fn test_missing_nearest_coordinate_fails() {
        let mut engine = ScriptedEngine::new();
        engine.nearest = None;
        let placement = PlacementEngine::new(engine);
        let err = placement.compute_percent_along(&source(), &flag()).await.unwrap_err();
        assert!(matches!(err, UnetError::NoNearestCoordinate));
    }

    #[tokio::test]
    async fn test_engine_failure_propagates() {
        for op in ["project", "geodesic_buffer", "cut", "planar_length"] {
            let mut engine = ScriptedEngine::new();
            engine.fail_on = Some(op);
            let placement = PlacementEngine::new(engine);
            let err = placement.compute_percent_along(&source(), &flag()).await.unwrap_err();
            match err {
                UnetError::GeometryError { operation, .. } => assert_eq!(operation, op),
                other => panic!("unexpected error for {op}: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_non_polyline_cutter_fails() {
        let mut engine = ScriptedEngine::new();
        engine.rotated = Some(Point::new(0.0, 0.0, None).into());
        let placement = PlacementEngine::new(engine);
        let err = placement.compute_percent_along(&source(), &flag()).await.unwrap_err();
        assert!(err.to_string().contains("expected a polyline cutter"));
    }

    #[tokio::test]
    async fn test_single_unanchored_part_fails() {
        let mut engine = ScriptedEngine::new();
        engine.parts = vec![line(vec![[25.0, 0.0], [100.0, 0.0]])];
        let placement = PlacementEngine::new(engine);
        assert!(placement.compute_percent_along(&source(), &flag()).await.is_err());
    }

    #[tokio::test]
    async fn test_point_without_spatial_reference_skips_projection() {
        let engine = ScriptedEngine::new();
        let placement = PlacementEngine::new(engine.clone());
        let point = Point::new(50.0, 0.0, None);
        placement.compute_percent_along(&source(), &point).await.unwrap();
        assert_eq!(engine.calls().await.first(), Some(&"nearest_coordinate"));
    }
}
