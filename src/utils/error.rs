use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnetError {
    #[error("No {field} field found in feature attributes.")]
    MissingFieldError { field: String },

    #[error("Geometry engine {operation} failed: {message}")]
    GeometryError { operation: String, message: String },

    #[error("No nearest coordinate found on the line for the flag point")]
    NoNearestCoordinate,

    #[error("Schema error: {message}")]
    SchemaError { message: String },

    #[error("Service error {code}: {message}")]
    ServiceError {
        code: i64,
        message: String,
        details: Vec<String>,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Feature,
    Geometry,
    Schema,
    Network,
    System,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl UnetError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingFieldError {
            field: field.into(),
        }
    }

    pub fn geometry(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GeometryError {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingFieldError { .. } => ErrorCategory::Feature,
            Self::GeometryError { .. } | Self::NoNearestCoordinate => ErrorCategory::Geometry,
            Self::SchemaError { .. } => ErrorCategory::Schema,
            Self::ServiceError { .. } | Self::ApiError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Feature | ErrorCategory::Geometry | ErrorCategory::Schema => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Feature => {
                "Check that the feature carries globalid, objectid, assetgroup and assettype fields"
            }
            ErrorCategory::Geometry => {
                "Check the line and flag geometries, and that the geometry engine is reachable"
            }
            ErrorCategory::Schema => "Reload the network data element and check it for duplicates",
            ErrorCategory::Network => {
                "Check the network service URL and token, then try again"
            }
            ErrorCategory::System => "Check file paths and permissions",
            ErrorCategory::Configuration => "Fix the configuration file or command line arguments",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ServiceError { message, .. } => format!("The network service rejected the request: {}", message),
            Self::ApiError(_) => "Could not reach the network service".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UnetError>;
