pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
use crate::domain::model::TraceLocationType;
#[cfg(feature = "cli")]
use crate::utils::error::{Result, UnetError};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "unet-trace")]
#[command(about = "Resolve utility network assets and build trace locations")]
pub struct CliConfig {
    /// Data element JSON file (bare or a queryDataElements response)
    #[arg(long, global = true)]
    pub schema: Option<String>,

    /// TOML configuration with a [service] section to fetch the schema from
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Layer whose data element is fetched from the service
    #[arg(long, global = true)]
    pub service_layer: Option<i64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines on stderr")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List network layer ids, junction sources first
    Layers,
    /// Resolve an asset type by layer, asset group and asset type code
    AssetType {
        #[arg(long)]
        layer: i64,
        #[arg(long)]
        group: i64,
        #[arg(long = "type")]
        asset_type: i64,
    },
    /// Show a terminal configuration
    TerminalConfig {
        #[arg(long)]
        id: i64,
    },
    /// Terminal ids for a feature on a junction layer
    Terminals {
        #[arg(long)]
        layer: i64,
        #[arg(long)]
        group: i64,
        #[arg(long = "type")]
        asset_type: i64,
    },
    /// Build trace locations for a feature
    TraceLocations {
        #[arg(long)]
        layer: i64,
        #[arg(long)]
        group: i64,
        #[arg(long = "type")]
        asset_type: i64,
        #[arg(long)]
        global_id: String,
        #[arg(long, default_value = "0")]
        percent_along: f64,
        #[arg(long, value_enum, default_value = "starting-point")]
        location: LocationKind,
        #[arg(long)]
        filter_barrier: bool,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LocationKind {
    StartingPoint,
    Barrier,
}

#[cfg(feature = "cli")]
impl From<LocationKind> for TraceLocationType {
    fn from(kind: LocationKind) -> Self {
        match kind {
            LocationKind::StartingPoint => TraceLocationType::StartingPoint,
            LocationKind::Barrier => TraceLocationType::Barrier,
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match (&self.schema, &self.config) {
            (Some(path), _) => validation::validate_path("schema", path)?,
            (None, Some(path)) => validation::validate_path("config", path)?,
            (None, None) => {
                return Err(UnetError::MissingConfigError {
                    field: "--schema or --config".to_string(),
                })
            }
        }

        if let Command::TraceLocations {
            global_id,
            percent_along,
            ..
        } = &self.command
        {
            validation::validate_non_empty_string("global_id", global_id)?;
            validation::validate_range("percent_along", *percent_along, 0.0, 1.0)?;
        }

        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace_locations_command() {
        let config = CliConfig::try_parse_from([
            "unet-trace",
            "--schema",
            "schema.json",
            "trace-locations",
            "--layer",
            "5",
            "--group",
            "3",
            "--type",
            "7",
            "--global-id",
            "{G}",
            "--percent-along",
            "0.4",
            "--location",
            "barrier",
        ])
        .unwrap();

        assert!(config.validate().is_ok());
        match config.command {
            Command::TraceLocations { layer, location, percent_along, .. } => {
                assert_eq!(layer, 5);
                assert_eq!(location, LocationKind::Barrier);
                assert_eq!(percent_along, 0.4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_schema_or_config_required() {
        let config = CliConfig::try_parse_from(["unet-trace", "layers"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_percent_along_out_of_range() {
        let config = CliConfig::try_parse_from([
            "unet-trace", "--schema", "s.json", "trace-locations", "--layer", "1", "--group", "1",
            "--type", "1", "--global-id", "{G}", "--percent-along", "1.5",
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }
}
