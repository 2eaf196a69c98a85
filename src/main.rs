use clap::Parser;
use unet_trace::config::Command;
use unet_trace::core::network_graphic::build_trace_locations;
use unet_trace::core::schema_resolver::require_terminal_configuration;
use unet_trace::core::SchemaSource;
use unet_trace::domain::model::NetworkFeature;
use unet_trace::domain::schema::NetworkSchema;
use unet_trace::utils::error::ErrorSeverity;
use unet_trace::utils::{logger, validation::Validate};
use unet_trace::{CliConfig, FileSchemaSource, Result, SchemaResolver, TomlConfig, UnetError};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    let toml_config = match config.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(toml_config) => toml_config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            std::process::exit(1);
        }
    };

    let json_logs = config.log_json || toml_config.as_ref().is_some_and(|c| c.json_logging());
    if json_logs {
        let level = if config.verbose {
            "debug"
        } else {
            toml_config.as_ref().map(|c| c.log_level()).unwrap_or("info")
        };
        logger::init_json_logger(level);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    let validated = config
        .validate()
        .and_then(|_| toml_config.as_ref().map_or(Ok(()), |c| c.validate()));
    if let Err(e) = validated {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config, toml_config.as_ref()).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn load_schema(config: &CliConfig, toml_config: Option<&TomlConfig>) -> Result<NetworkSchema> {
    if let Some(path) = &config.schema {
        return FileSchemaSource::new(path).load_schema().await;
    }
    let toml_config = toml_config.ok_or_else(|| UnetError::MissingConfigError {
        field: "--schema or --config".to_string(),
    })?;
    toml_config
        .http_schema_source(config.service_layer)?
        .load_schema()
        .await
}

async fn run(config: &CliConfig, toml_config: Option<&TomlConfig>) -> Result<String> {
    let schema = load_schema(config, toml_config).await?;
    let resolver = SchemaResolver::new(&schema);

    let output = match &config.command {
        Command::Layers => serde_json::json!({
            "junctionLayerIds": resolver.junction_layer_ids(),
            "edgeLayerIds": resolver.edge_layer_ids(),
            "networkLayerIds": resolver.network_layer_ids(),
        }),
        Command::AssetType {
            layer,
            group,
            asset_type,
        } => match resolver.resolve_asset_type(*layer, *group, *asset_type) {
            Some(resolved) => serde_json::to_value(resolved)?,
            None => {
                tracing::warn!("No asset type for layer {} group {} type {}", layer, group, asset_type);
                serde_json::Value::Null
            }
        },
        Command::TerminalConfig { id } => {
            serde_json::to_value(require_terminal_configuration(&resolver, *id)?)?
        }
        Command::Terminals {
            layer,
            group,
            asset_type,
        } => {
            let feature = code_feature(*layer, *group, *asset_type);
            serde_json::to_value(resolver.collect_terminal_ids(&feature)?)?
        }
        Command::TraceLocations {
            layer,
            group,
            asset_type,
            global_id,
            percent_along,
            location,
            filter_barrier,
        } => {
            let feature = code_feature(*layer, *group, *asset_type);
            let terminal_ids = resolver.collect_terminal_ids(&feature)?;
            let locations = build_trace_locations(
                global_id,
                *percent_along,
                (*location).into(),
                *filter_barrier,
                &terminal_ids,
            );
            serde_json::to_value(locations)?
        }
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

fn code_feature(layer_id: i64, asset_group: i64, asset_type: i64) -> NetworkFeature {
    let mut attributes = serde_json::Map::new();
    attributes.insert("assetgroup".to_string(), asset_group.into());
    attributes.insert("assettype".to_string(), asset_type.into());
    NetworkFeature {
        layer_id,
        attributes,
        geometry: None,
    }
}
