use crate::core::SchemaSource;
use crate::domain::schema::NetworkSchema;
use crate::utils::error::{Result, UnetError};
use crate::utils::validation::validate_url;
use reqwest::Client;
use std::time::Duration;

/// Fetches the data element from a utility network service's
/// `queryDataElements` endpoint.
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    client: Client,
    service_url: String,
    layer_id: i64,
    token: Option<String>,
}

impl HttpSchemaSource {
    pub fn new(service_url: &str, layer_id: i64) -> Result<Self> {
        validate_url("service.url", service_url)?;
        Ok(Self {
            client: Client::new(),
            service_url: service_url.trim_end_matches('/').to_string(),
            layer_id,
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/queryDataElements", self.service_url)
    }
}

impl SchemaSource for HttpSchemaSource {
    async fn load_schema(&self) -> Result<NetworkSchema> {
        let mut query = vec![
            ("f", "json".to_string()),
            ("layers", format!("[{}]", self.layer_id)),
        ];
        if let Some(token) = &self.token {
            query.push(("token", token.clone()));
        }

        tracing::debug!("Requesting data element from {}", self.endpoint());
        let response = self.client.get(self.endpoint()).query(&query).send().await?;
        let status = response.status();
        tracing::debug!("Data element response status: {}", status);

        if !status.is_success() {
            return Err(UnetError::ServiceError {
                code: i64::from(status.as_u16()),
                message: format!("queryDataElements returned HTTP {}", status),
                details: vec![],
            });
        }

        let body: serde_json::Value = response.json().await?;
        NetworkSchema::from_json(body)
    }
}
