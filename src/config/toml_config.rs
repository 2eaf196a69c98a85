use crate::adapters::HttpSchemaSource;
use crate::core::placement::PlacementOptions;
use crate::utils::error::{Result, UnetError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: Option<ServiceConfig>,
    #[serde(default)]
    pub placement: PlacementOptions,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Utility network service URL, e.g. `.../FeatureServer/UtilityNetworkServer`.
    pub url: String,
    /// Layer whose data element is requested.
    pub layer_id: Option<i64>,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(UnetError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| UnetError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` references with environment values. Unset variables
    /// are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UnetError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(service) = &self.service {
            validation::validate_url("service.url", &service.url)?;
            if let Some(timeout) = service.timeout_seconds {
                validation::validate_range("service.timeout_seconds", timeout, 1, 600)?;
            }
        }

        validation::validate_positive_distance(
            "placement.buffer_distance",
            self.placement.buffer_distance,
        )?;
        validation::validate_range(
            "placement.rotation_degrees",
            self.placement.rotation_degrees,
            -360.0,
            360.0,
        )?;

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(UnetError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn placement_options(&self) -> PlacementOptions {
        self.placement
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// Schema source for the configured service. `layer_override` wins over
    /// `service.layer_id`.
    pub fn http_schema_source(&self, layer_override: Option<i64>) -> Result<HttpSchemaSource> {
        let service = self.service.as_ref().ok_or_else(|| UnetError::MissingConfigError {
            field: "service".to_string(),
        })?;
        let layer_id = layer_override
            .or(service.layer_id)
            .ok_or_else(|| UnetError::MissingConfigError {
                field: "service.layer_id".to_string(),
            })?;

        let source = HttpSchemaSource::new(&service.url, layer_id)?.with_token(service.token.clone());
        match service.timeout_seconds {
            Some(seconds) => source.with_timeout(Duration::from_secs(seconds)),
            None => Ok(source),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::LinearUnit;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[service]
url = "https://example.com/server/rest/services/Electric/FeatureServer/UtilityNetworkServer"
layer_id = 17
timeout_seconds = 30

[placement]
buffer_distance = 10.0
buffer_unit = "meters"

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        let options = config.placement_options();
        assert_eq!(options.buffer_distance, 10.0);
        assert_eq!(options.buffer_unit, LinearUnit::Meters);
        assert_eq!(options.length_unit, LinearUnit::Feet);
        assert_eq!(options.rotation_degrees, 90.0);
        assert_eq!(config.log_level(), "debug");
        assert!(config.json_logging());
        assert!(config.http_schema_source(None).is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.placement_options(), PlacementOptions::default());
        assert_eq!(config.log_level(), "info");
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.http_schema_source(Some(3)),
            Err(UnetError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("UNET_TRACE_TEST_TOKEN", "secret-token");

        let toml_content = r#"
[service]
url = "https://example.com/UtilityNetworkServer"
token = "${UNET_TRACE_TEST_TOKEN}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.service.as_ref().unwrap().token.as_deref(),
            Some("secret-token")
        );

        std::env::remove_var("UNET_TRACE_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str("[service]\nurl = \"not-a-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_buffer = TomlConfig::from_toml_str("[placement]\nbuffer_distance = 0.0\n").unwrap();
        assert!(bad_buffer.validate().is_err());

        let bad_level = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_missing_layer_id() {
        let config =
            TomlConfig::from_toml_str("[service]\nurl = \"https://example.com/un\"\n").unwrap();
        assert!(matches!(
            config.http_schema_source(None),
            Err(UnetError::MissingConfigError { field }) if field == "service.layer_id"
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[placement]\nrotation_degrees = 45.0\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.placement_options().rotation_degrees, 45.0);
    }
}
