pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileSchemaSource, HttpSchemaSource};
pub use config::toml_config::TomlConfig;
pub use crate::core::{
    placement::{PlacementEngine, PlacementOptions},
    schema_resolver::SchemaResolver,
    trace_input::TraceInputBuilder,
};
pub use utils::error::{Result, UnetError};
