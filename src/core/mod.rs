pub mod fields;
pub mod labels;
pub mod network_graphic;
pub mod placement;
pub mod schema_resolver;
pub mod trace_input;

pub use crate::domain::model::{NetworkFeature, NetworkGraphic, PlacementResult, TraceLocation};
pub use crate::domain::ports::{GeometryEngine, SchemaSource};
pub use crate::utils::error::Result;
