use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Municipality as listed by the external address registry. Only the name is read; the code, region and
 * geometry fields are ignored.
 */
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExternalMunicipality {
    #[serde(rename = "navn")]
    pub name: String,
}

/**
 * Municipality as stored by the backend.
 */
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Municipality {
    #[serde(rename = "municipalityId")]
    pub id: i64,
    #[serde(rename = "municipalityName")]
    pub name: String,
}

/**
 * Parish with its municipality embedded by the backend at read time.
 */
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parish {
    #[serde(rename = "parishId")]
    pub id: i64,
    #[serde(rename = "parishCode")]
    pub code: i32,
    #[serde(rename = "parishName")]
    pub name: String,
    #[serde(rename = "infectionPercent")]
    pub infection_percent: f64,
    #[serde(rename = "shutdownDate")]
    pub shutdown_date: Option<NaiveDate>,
    pub municipality: Municipality,
}

impl Parish {
    /**
     * Shutdown status of the parish as seen on `today`.
     */
    pub fn shutdown_status(&self, today: NaiveDate) -> ShutdownStatus {
        ShutdownStatus::derive(self.shutdown_date, today)
    }
}

/**
 * Parish line of a municipality summary.
 */
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParishSummary {
    #[serde(rename = "parishName")]
    pub name: String,
    #[serde(rename = "infectionPercent")]
    pub infection_percent: f64,
}

/**
 * Municipality with its aggregate infection percent and its parishes, as computed by the backend.
 */
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MunicipalitySummary {
    #[serde(rename = "municipalityName")]
    pub name: String,
    #[serde(rename = "totalInfectionPercent")]
    pub total_infection_percent: f64,
    pub parishes: Vec<ParishSummary>,
}

/**
 * Shutdown state derived from a parish shutdown date. Never stored.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStatus {
    /**
     * No shutdown date set.
     */
    NotPlanned,
    /**
     * Shutdown date is today or in the past.
     */
    ShutDown,
    /**
     * Shutdown date is in the future.
     */
    Scheduled,
}

impl ShutdownStatus {
    /**
     * Derives the status of `shutdown_date` relative to `today`.
     */
    pub fn derive(shutdown_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match shutdown_date {
            None => ShutdownStatus::NotPlanned,
            Some(date) if date > today => ShutdownStatus::Scheduled,
            Some(_) => ShutdownStatus::ShutDown,
        }
    }

    /**
     * Whether the shutdown checkbox is checked.
     */
    pub fn is_checked(self) -> bool {
        self == ShutdownStatus::ShutDown
    }
}

/**
 * One element of the bulk municipality insert.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityAddInputType {
    pub name: String,
}

impl From<&ExternalMunicipality> for MunicipalityAddInputType {
    fn from(external: &ExternalMunicipality) -> Self {
        MunicipalityAddInputType { name: external.name.clone() }
    }
}

/**
 * Entry of the municipality dropdown in the create form. The value submitted is the municipality id.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityOption {
    pub municipality_id: i64,
    pub name: String,
}

/**
 * Validated input for creating a parish.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ParishCreateInputType {
    pub code: i32,
    pub name: String,
    pub infection_percent: f64,
    pub municipality_id: i64,
}

impl ParishCreateInputType {
    /**
     * Validates the input.
     *
     * # Returns
     * The input or an `ApplicationError` of type `Validation`.
     */
    pub fn validate(self) -> Result<Self, ApplicationError> {
        validate_name(&self.name)?;
        validate_infection_percent(self.infection_percent)?;
        Ok(self)
    }
}

/**
 * Validated input for updating a parish.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ParishUpdateInputType {
    pub id: i64,
    pub code: i32,
    pub name: String,
    pub infection_percent: f64,
    pub shutdown_date: Option<NaiveDate>,
}

impl ParishUpdateInputType {
    /**
     * Validates the input.
     *
     * # Returns
     * The input or an `ApplicationError` of type `Validation`.
     */
    pub fn validate(self) -> Result<Self, ApplicationError> {
        validate_name(&self.name)?;
        validate_infection_percent(self.infection_percent)?;
        Ok(self)
    }
}

/**
 * Values the edit overlay is pre-filled with.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct EditSurface {
    pub parish_id: i64,
    pub code: i32,
    pub name: String,
    pub infection_percent: f64,
    pub shutdown_date: Option<NaiveDate>,
}

impl From<Parish> for EditSurface {
    fn from(parish: Parish) -> Self {
        EditSurface { parish_id: parish.id, code: parish.code, name: parish.name, infection_percent: parish.infection_percent, shutdown_date: parish.shutdown_date }
    }
}

/**
 * Answer of the user to the delete confirmation.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Declined,
}

/**
 * What the page does after a workflow has run.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /**
     * Discard the page and run the whole load sequence again.
     */
    Reload,
    /**
     * Keep the current page as it is.
     */
    Stay,
}

fn validate_name(name: &str) -> Result<(), ApplicationError> {
    if name.trim().is_empty() {
        return Err(ApplicationError::new(ErrorType::Validation, "Parish name is required".to_string()));
    }
    Ok(())
}

fn validate_infection_percent(infection_percent: f64) -> Result<(), ApplicationError> {
    if !(0.0..=100.0).contains(&infection_percent) {
        return Err(ApplicationError::new(ErrorType::Validation, format!("Infection percent {infection_percent} must be between 0 and 100")));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_shutdown_status_not_planned() {
        let status = ShutdownStatus::derive(None, date(2024, 3, 10));
        assert_eq!(status, ShutdownStatus::NotPlanned);
        assert!(!status.is_checked());
    }

    #[test]
    fn test_shutdown_status_past_and_today_are_shut_down() {
        let today = date(2024, 3, 10);
        assert!(ShutdownStatus::derive(Some(date(2024, 3, 9)), today).is_checked());
        assert!(ShutdownStatus::derive(Some(today), today).is_checked());
    }

    #[test]
    fn test_shutdown_status_future_is_scheduled() {
        let status = ShutdownStatus::derive(Some(date(2024, 3, 11)), date(2024, 3, 10));
        assert_eq!(status, ShutdownStatus::Scheduled);
        assert!(!status.is_checked());
    }

    #[test]
    fn test_parish_deserialization() {
        let json = r#"{
            "parishId": 7,
            "parishCode": 100,
            "parishName": "Test",
            "infectionPercent": 5.0,
            "shutdownDate": null,
            "municipality": { "municipalityId": 3, "municipalityName": "Aarhus" }
        }"#;
        let parish: Parish = serde_json::from_str(json).unwrap();
        assert_eq!(parish.id, 7);
        assert_eq!(parish.code, 100);
        assert_eq!(parish.shutdown_date, None);
        assert_eq!(parish.municipality, Municipality { id: 3, name: "Aarhus".to_string() });
    }

    #[test]
    fn test_external_municipality_ignores_unknown_fields() {
        let json = r#"[{ "kode": "0101", "navn": "København", "regionskode": "1084", "bbox": [12.4, 55.6] }]"#;
        let municipalities: Vec<ExternalMunicipality> = serde_json::from_str(json).unwrap();
        assert_eq!(municipalities, vec![ExternalMunicipality { name: "København".to_string() }]);
    }

    #[test]
    fn test_create_input_validation() {
        let input = ParishCreateInputType { code: 1, name: "Gyllen".to_string(), infection_percent: 100.0, municipality_id: 2 };
        assert!(input.validate().is_ok());
        let input = ParishCreateInputType { code: 1, name: "Gyllen".to_string(), infection_percent: 100.5, municipality_id: 2 };
        assert_eq!(input.validate().unwrap_err().error_type, ErrorType::Validation);
        let input = ParishCreateInputType { code: 1, name: " ".to_string(), infection_percent: 1.0, municipality_id: 2 };
        assert_eq!(input.validate().unwrap_err().error_type, ErrorType::Validation);
    }

    #[test]
    fn test_update_input_rejects_negative_percent() {
        let input = ParishUpdateInputType { id: 1, code: 1, name: "Bov".to_string(), infection_percent: -1.0, shutdown_date: None };
        assert!(input.validate().is_err());
    }
}
