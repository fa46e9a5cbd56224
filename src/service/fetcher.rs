use std::{collections::HashSet, sync::Arc};

use crate::{
    dao::{backend::ParishBackend, registry::MunicipalityRegistry},
    model::{
        apperror::ApplicationError,
        models::{ExternalMunicipality, MunicipalityOption, MunicipalitySummary, Parish},
    },
};

/**
 * Reads reference data from the address registry and parish data from the backend.
 *
 * No retries and no pagination. Every failure is returned to the caller as is.
 */
#[derive(Clone)]
pub struct ReferenceFetcher {
    /**
     * The parish backend.
     */
    backend: Arc<dyn ParishBackend>,
    /**
     * The external address registry.
     */
    registry: Arc<dyn MunicipalityRegistry>,
}

impl ReferenceFetcher {
    /**
     * Creates a new instance of `ReferenceFetcher`.
     *
     * # Arguments
     * `backend`: The parish backend.
     * `registry`: The external address registry.
     *
     * # Returns
     * A new instance of `ReferenceFetcher`.
     */
    pub fn new(backend: Arc<dyn ParishBackend>, registry: Arc<dyn MunicipalityRegistry>) -> Self {
        ReferenceFetcher { backend, registry }
    }

    /**
     * Retrieves the municipality listing of the address registry, in registry order.
     */
    pub async fn fetch_external_municipalities(&self) -> Result<Vec<ExternalMunicipality>, ApplicationError> {
        self.registry.get_municipalities().await
    }

    /**
     * Retrieves all parishes known by the backend.
     */
    pub async fn fetch_local_parishes(&self) -> Result<Vec<Parish>, ApplicationError> {
        self.backend.get_all_parishes().await
    }

    /**
     * Retrieves a single parish.
     */
    pub async fn fetch_parish(&self, parish_id: i64) -> Result<Parish, ApplicationError> {
        self.backend.get_parish_by_id(parish_id).await
    }

    /**
     * Retrieves the municipalities with their aggregate infection percent and parishes.
     */
    pub async fn fetch_municipality_summaries(&self) -> Result<Vec<MunicipalitySummary>, ApplicationError> {
        self.backend.get_municipality_info().await
    }

    /**
     * Retrieves the entries of the municipality dropdown of the create form.
     */
    pub async fn fetch_municipality_options(&self) -> Result<Vec<MunicipalityOption>, ApplicationError> {
        let external_municipalities = self.fetch_external_municipalities().await?;
        Ok(municipality_options(&external_municipalities))
    }
}

/**
 * Registry entries with repeated names removed. The first occurrence wins and order is kept.
 */
pub fn distinct_municipalities(external_municipalities: &[ExternalMunicipality]) -> Vec<&ExternalMunicipality> {
    let mut seen = HashSet::new();
    external_municipalities.iter().filter(|municipality| seen.insert(municipality.name.as_str())).collect()
}

/**
 * Builds dropdown options from the registry listing.
 *
 * The backend assigns municipality ids in the order of the bulk insert starting at 1 and offers no listing to
 * look them up, so the id is resolved here once from the position in the seeded list.
 */
pub fn municipality_options(external_municipalities: &[ExternalMunicipality]) -> Vec<MunicipalityOption> {
    distinct_municipalities(external_municipalities)
        .into_iter()
        .zip(1..)
        .map(|(municipality, municipality_id)| MunicipalityOption { municipality_id, name: municipality.name.clone() })
        .collect()
}
