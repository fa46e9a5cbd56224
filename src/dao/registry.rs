use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::ExternalMunicipality,
};

/**
 * Read-only access to the external address registry.
 */
#[async_trait]
pub trait MunicipalityRegistry: Send + Sync {
    async fn get_municipalities(&self) -> Result<Vec<ExternalMunicipality>, ApplicationError>;
}

/**
 * DAO reading the municipality listing of the address registry over HTTP.
 */
pub struct RegistryDao {
    client: Client,
    municipalities_url: String,
}

impl RegistryDao {
    pub fn new(client: Client, municipalities_url: &str) -> Self {
        RegistryDao { client, municipalities_url: municipalities_url.to_string() }
    }
}

#[async_trait]
impl MunicipalityRegistry for RegistryDao {
    #[instrument(skip(self), fields(url = %self.municipalities_url, result))]
    async fn get_municipalities(&self) -> Result<Vec<ExternalMunicipality>, ApplicationError> {
        let response = self
            .client
            .get(&self.municipalities_url)
            .send()
            .await
            .map_err(|err| ApplicationError::new(ErrorType::Registry, format!("Failed to call address registry: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::new(ErrorType::Registry, format!("Address registry answered with status {status}")));
        }
        let municipalities: Vec<ExternalMunicipality> =
            response.json().await.map_err(|err| ApplicationError::new(ErrorType::Decode, format!("Failed to decode address registry response: {err}")))?;
        tracing::debug!("Address registry listed {} municipalities", municipalities.len());
        Ok(municipalities)
    }
}
