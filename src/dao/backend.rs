use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{instrument, warn};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{MunicipalityAddInputType, MunicipalitySummary, Parish, ParishCreateInputType, ParishUpdateInputType},
};

/**
 * Path listing all parishes with their municipality embedded.
 */
const ALL_PARISHES: &str = "/api/allParishes";

/**
 * Path prefix for reading a single parish.
 */
const PARISH_BY_ID: &str = "/api/getParishById";

/**
 * Path listing municipalities with aggregate infection percent and parishes.
 */
const MUNICIPALITY_INFO: &str = "/api/municipalityInfo";

/**
 * Path for creating a parish.
 */
const CREATE_PARISH: &str = "/api/create";

/**
 * Path for updating a parish.
 */
const UPDATE_PARISH: &str = "/api/updateParish";

/**
 * Path prefix for deleting a parish.
 */
const DELETE_PARISH: &str = "/api/delete";

/**
 * Path for the bulk municipality insert.
 */
const ADD_MUNICIPALITIES: &str = "/api/addMunicipalities";

/**
 * Path seeding demo parishes.
 */
const ADD_DEMO_DATA: &str = "/api/addDemoData";

/**
 * Operations of the parish backend.
 *
 * Reads fail on transport errors, failure statuses and undecodable bodies. Mutations only fail on
 * transport errors; a failure status is logged and otherwise ignored.
 */
#[async_trait]
pub trait ParishBackend: Send + Sync {
    async fn get_all_parishes(&self) -> Result<Vec<Parish>, ApplicationError>;
    async fn get_parish_by_id(&self, parish_id: i64) -> Result<Parish, ApplicationError>;
    async fn get_municipality_info(&self) -> Result<Vec<MunicipalitySummary>, ApplicationError>;
    async fn create_parish(&self, parish_create_input: ParishCreateInputType) -> Result<(), ApplicationError>;
    async fn update_parish(&self, parish_update_input: ParishUpdateInputType) -> Result<(), ApplicationError>;
    async fn delete_parish(&self, parish_id: i64) -> Result<(), ApplicationError>;
    async fn add_municipalities(&self, municipalities: Vec<MunicipalityAddInputType>) -> Result<(), ApplicationError>;
    async fn add_demo_data(&self) -> Result<(), ApplicationError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParishCreateRequest {
    parish_code: i32,
    parish_name: String,
    parish_infection_percent: f64,
    municipality_id: i64,
}

impl From<ParishCreateInputType> for ParishCreateRequest {
    fn from(input: ParishCreateInputType) -> Self {
        ParishCreateRequest { parish_code: input.code, parish_name: input.name, parish_infection_percent: input.infection_percent, municipality_id: input.municipality_id }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParishUpdateRequest {
    parish_id: i64,
    parish_code: i32,
    parish_name: String,
    parish_infection_percent: f64,
    parish_shutdown_date: Option<NaiveDate>,
}

impl From<ParishUpdateInputType> for ParishUpdateRequest {
    fn from(input: ParishUpdateInputType) -> Self {
        ParishUpdateRequest {
            parish_id: input.id,
            parish_code: input.code,
            parish_name: input.name,
            parish_infection_percent: input.infection_percent,
            parish_shutdown_date: input.shutdown_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MunicipalityAddRequest {
    municipality_name: String,
}

impl From<MunicipalityAddInputType> for MunicipalityAddRequest {
    fn from(input: MunicipalityAddInputType) -> Self {
        MunicipalityAddRequest { municipality_name: input.name }
    }
}

/**
 * DAO calling the parish backend over HTTP.
 */
pub struct BackendDao {
    /**
     * Shared HTTP client.
     */
    client: Client,
    /**
     * Base url without trailing slash.
     */
    base_url: String,
}

impl BackendDao {
    /**
     * Creates a new instance of `BackendDao`.
     *
     * # Arguments
     * `client`: HTTP client to send requests with.
     * `base_url`: Base url of the backend. A trailing slash is removed.
     *
     * # Returns
     * A new instance of `BackendDao`.
     */
    pub fn new(client: Client, base_url: &str) -> Self {
        BackendDao { client, base_url: base_url.trim_end_matches('/').to_string() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /**
     * Sends a GET request and decodes the JSON body.
     */
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApplicationError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|err| ApplicationError::new(ErrorType::Backend, format!("Failed to call backend {path}: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::new(ErrorType::Backend, format!("Backend {path} answered with status {status}")));
        }
        response.json::<T>().await.map_err(|err| ApplicationError::new(ErrorType::Decode, format!("Failed to decode response from {path}: {err}")))
    }

    /**
     * Sends a mutating request. The response status is only logged.
     */
    async fn send_mutation(request: RequestBuilder, path: &str) -> Result<(), ApplicationError> {
        let response = request.send().await.map_err(|err| ApplicationError::new(ErrorType::Backend, format!("Failed to call backend {path}: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            warn!("Backend {} answered with status {}", path, status);
        }
        Ok(())
    }
}

#[async_trait]
impl ParishBackend for BackendDao {
    #[instrument(skip(self), fields(result))]
    async fn get_all_parishes(&self) -> Result<Vec<Parish>, ApplicationError> {
        self.get_json(ALL_PARISHES).await
    }

    #[instrument(skip(self), fields(result))]
    async fn get_parish_by_id(&self, parish_id: i64) -> Result<Parish, ApplicationError> {
        self.get_json(&format!("{PARISH_BY_ID}/{parish_id}")).await
    }

    #[instrument(skip(self), fields(result))]
    async fn get_municipality_info(&self) -> Result<Vec<MunicipalitySummary>, ApplicationError> {
        self.get_json(MUNICIPALITY_INFO).await
    }

    #[instrument(skip(self), fields(result))]
    async fn create_parish(&self, parish_create_input: ParishCreateInputType) -> Result<(), ApplicationError> {
        let request = self.client.post(self.url(CREATE_PARISH)).json(&ParishCreateRequest::from(parish_create_input));
        Self::send_mutation(request, CREATE_PARISH).await
    }

    #[instrument(skip(self), fields(result))]
    async fn update_parish(&self, parish_update_input: ParishUpdateInputType) -> Result<(), ApplicationError> {
        let request = self.client.post(self.url(UPDATE_PARISH)).json(&ParishUpdateRequest::from(parish_update_input));
        Self::send_mutation(request, UPDATE_PARISH).await
    }

    #[instrument(skip(self), fields(result))]
    async fn delete_parish(&self, parish_id: i64) -> Result<(), ApplicationError> {
        let path = format!("{DELETE_PARISH}/{parish_id}");
        let request = self.client.delete(self.url(&path));
        Self::send_mutation(request, &path).await
    }

    #[instrument(skip(self, municipalities), fields(count = municipalities.len(), result))]
    async fn add_municipalities(&self, municipalities: Vec<MunicipalityAddInputType>) -> Result<(), ApplicationError> {
        let body: Vec<MunicipalityAddRequest> = municipalities.into_iter().map(MunicipalityAddRequest::from).collect();
        let request = self.client.post(self.url(ADD_MUNICIPALITIES)).json(&body);
        Self::send_mutation(request, ADD_MUNICIPALITIES).await
    }

    #[instrument(skip(self), fields(result))]
    async fn add_demo_data(&self) -> Result<(), ApplicationError> {
        let request = self.client.get(self.url(ADD_DEMO_DATA));
        Self::send_mutation(request, ADD_DEMO_DATA).await
    }
}
