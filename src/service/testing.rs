use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    dao::{backend::ParishBackend, registry::MunicipalityRegistry},
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{ExternalMunicipality, Municipality, MunicipalityAddInputType, MunicipalitySummary, Parish, ParishCreateInputType, ParishUpdateInputType},
    },
};

/**
 * Call received by `FakeBackend`.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    GetAllParishes,
    GetParishById(i64),
    GetMunicipalityInfo,
    CreateParish(ParishCreateInputType),
    UpdateParish(ParishUpdateInputType),
    DeleteParish(i64),
    AddMunicipalities(Vec<MunicipalityAddInputType>),
    AddDemoData,
}

/**
 * In-memory backend recording every call.
 */
#[derive(Default)]
pub struct FakeBackend {
    pub parishes: Vec<Parish>,
    pub summaries: Vec<MunicipalitySummary>,
    pub fail: bool,
    calls: Mutex<Vec<BackendCall>>,
}

impl FakeBackend {
    pub fn with_parishes(parishes: Vec<Parish>) -> Self {
        FakeBackend { parishes, ..Default::default() }
    }

    pub fn with_summaries(summaries: Vec<MunicipalitySummary>) -> Self {
        FakeBackend { summaries, ..Default::default() }
    }

    pub fn failing() -> Self {
        FakeBackend { fail: true, ..Default::default() }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: BackendCall) -> Result<(), ApplicationError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(ApplicationError::new(ErrorType::Backend, "Backend unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ParishBackend for FakeBackend {
    async fn get_all_parishes(&self) -> Result<Vec<Parish>, ApplicationError> {
        self.record(BackendCall::GetAllParishes)?;
        Ok(self.parishes.clone())
    }

    async fn get_parish_by_id(&self, parish_id: i64) -> Result<Parish, ApplicationError> {
        self.record(BackendCall::GetParishById(parish_id))?;
        self.parishes
            .iter()
            .find(|parish| parish.id == parish_id)
            .cloned()
            .ok_or_else(|| ApplicationError::new(ErrorType::Backend, format!("Parish {parish_id} not found")))
    }

    async fn get_municipality_info(&self) -> Result<Vec<MunicipalitySummary>, ApplicationError> {
        self.record(BackendCall::GetMunicipalityInfo)?;
        Ok(self.summaries.clone())
    }

    async fn create_parish(&self, parish_create_input: ParishCreateInputType) -> Result<(), ApplicationError> {
        self.record(BackendCall::CreateParish(parish_create_input))
    }

    async fn update_parish(&self, parish_update_input: ParishUpdateInputType) -> Result<(), ApplicationError> {
        self.record(BackendCall::UpdateParish(parish_update_input))
    }

    async fn delete_parish(&self, parish_id: i64) -> Result<(), ApplicationError> {
        self.record(BackendCall::DeleteParish(parish_id))
    }

    async fn add_municipalities(&self, municipalities: Vec<MunicipalityAddInputType>) -> Result<(), ApplicationError> {
        self.record(BackendCall::AddMunicipalities(municipalities))
    }

    async fn add_demo_data(&self) -> Result<(), ApplicationError> {
        self.record(BackendCall::AddDemoData)
    }
}

/**
 * In-memory address registry.
 */
pub struct FakeRegistry {
    municipalities: Vec<ExternalMunicipality>,
    calls: AtomicUsize,
    /**
     * Time every listing takes to arrive.
     */
    delay: Duration,
}

impl FakeRegistry {
    pub fn new(municipalities: Vec<ExternalMunicipality>) -> Self {
        FakeRegistry { municipalities, calls: AtomicUsize::new(0), delay: Duration::ZERO }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MunicipalityRegistry for FakeRegistry {
    async fn get_municipalities(&self) -> Result<Vec<ExternalMunicipality>, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.municipalities.clone())
    }
}

pub fn external_municipality(name: &str) -> ExternalMunicipality {
    ExternalMunicipality { name: name.to_string() }
}

pub fn parish(id: i64, code: i32, name: &str, infection_percent: f64, shutdown_date: Option<NaiveDate>) -> Parish {
    Parish { id, code, name: name.to_string(), infection_percent, shutdown_date, municipality: Municipality { id: 1, name: "Aarhus".to_string() } }
}
