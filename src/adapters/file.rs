use crate::core::SchemaSource;
use crate::domain::schema::NetworkSchema;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// Reads a saved data element, bare or as a `queryDataElements` response.
#[derive(Debug, Clone)]
pub struct FileSchemaSource {
    path: PathBuf,
}

impl FileSchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaSource for FileSchemaSource {
    async fn load_schema(&self) -> Result<NetworkSchema> {
        tracing::debug!("Reading network schema from {}", self.path.display());
        let content = fs::read_to_string(&self.path)?;
        NetworkSchema::from_json_str(&content)
    }
}
