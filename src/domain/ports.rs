use crate::domain::geometry::{
    Geometry, LinearUnit, NearestPointResult, Point, Polygon, Polyline, SpatialReference,
};
use crate::domain::schema::NetworkSchema;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Provides a read-only network schema snapshot.
pub trait SchemaSource: Send + Sync {
    fn load_schema(&self) -> impl std::future::Future<Output = Result<NetworkSchema>> + Send;
}

/// The geometry primitives placement is built from. Implementations wrap a
/// real geometry engine; every call may fail and failures are passed through.
#[async_trait]
pub trait GeometryEngine: Send + Sync {
    async fn project(&self, line: &Polyline, spatial_reference: &SpatialReference)
        -> Result<Polyline>;

    async fn nearest_coordinate(&self, line: &Polyline, point: &Point)
        -> Result<NearestPointResult>;

    async fn geodesic_buffer(&self, point: &Point, distance: f64, unit: LinearUnit)
        -> Result<Polygon>;

    /// `None` when the geometries do not intersect.
    async fn intersect(&self, line: &Polyline, polygon: &Polygon) -> Result<Option<Geometry>>;

    /// Rotates counter-clockwise about the geometry's centroid.
    async fn rotate(&self, geometry: &Geometry, degrees: f64) -> Result<Geometry>;

    async fn cut(&self, line: &Polyline, cutter: &Polyline) -> Result<Vec<Polyline>>;

    async fn planar_length(&self, line: &Polyline, unit: LinearUnit) -> Result<f64>;
}
