use std::str::FromStr;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{Decision, ParishCreateInputType, ParishUpdateInputType},
};

/***************** Parish page models *********************/

/**
 * Query parameters of the parish page.
 */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParishPageQuery {
    /**
     * Parish the edit overlay is opened for.
     */
    pub edit: Option<i64>,
}

/***************** Parish form models *********************/

/**
 * Fields of the create form, as submitted.
 */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParishCreateForm {
    pub parish_code: String,
    pub parish_name: String,
    pub parish_infection_percent: String,
    /**
     * Value of the selected dropdown option, which is the municipality id.
     */
    pub municipality: String,
}

impl TryFrom<ParishCreateForm> for ParishCreateInputType {
    type Error = ApplicationError;

    fn try_from(form: ParishCreateForm) -> Result<Self, Self::Error> {
        Ok(ParishCreateInputType {
            code: parse_field("parishCode", &form.parish_code)?,
            name: form.parish_name.trim().to_string(),
            infection_percent: parse_field("parishInfectionPercent", &form.parish_infection_percent)?,
            municipality_id: parse_field("municipality", &form.municipality)?,
        })
    }
}

/**
 * Fields of the edit form, as submitted. An empty shutdown date clears it.
 */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParishUpdateForm {
    pub parish_code: String,
    pub parish_name: String,
    pub parish_infection_percent: String,
    #[serde(default)]
    pub parish_shutdown_date: String,
}

impl TryFrom<(i64, ParishUpdateForm)> for ParishUpdateInputType {
    type Error = ApplicationError;

    fn try_from((parish_id, form): (i64, ParishUpdateForm)) -> Result<Self, Self::Error> {
        let shutdown_date = match form.parish_shutdown_date.trim() {
            "" => None,
            date => Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|err| ApplicationError::new(ErrorType::Validation, format!("Invalid parishShutdownDate {date}: {err}")))?),
        };
        Ok(ParishUpdateInputType {
            id: parish_id,
            code: parse_field("parishCode", &form.parish_code)?,
            name: form.parish_name.trim().to_string(),
            infection_percent: parse_field("parishInfectionPercent", &form.parish_infection_percent)?,
            shutdown_date,
        })
    }
}

/**
 * Answer of the delete confirmation.
 */
#[derive(Debug, Deserialize)]
pub struct ParishDeleteForm {
    pub decision: DecisionField,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecisionField {
    Accept,
    Decline,
}

impl From<DecisionField> for Decision {
    fn from(decision: DecisionField) -> Self {
        match decision {
            DecisionField::Accept => Decision::Accepted,
            DecisionField::Decline => Decision::Declined,
        }
    }
}

/**
 * Parses a required form field.
 */
fn parse_field<T: FromStr>(name: &str, value: &str) -> Result<T, ApplicationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApplicationError::new(ErrorType::Validation, format!("{name} is required")));
    }
    value.parse::<T>().map_err(|_err| ApplicationError::new(ErrorType::Validation, format!("Invalid {name}: {value}")))
}

/***************** Error models *********************/

/**
 * Custom error response for the application.
 */
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /**
     * The error code associated with the error type.
     */
    pub code: u16,
    /**
     * A human-readable message describing the error.
     */
    pub message: String,
}

impl ResponseError for ApplicationError {
    fn status_code(&self) -> StatusCode {
        get_statuscode(&self.error_type)
    }

    /**
     * Generates an error response for the application error.
     */
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse { code: get_error_code(&self.error_type), message: self.message.clone() };
        HttpResponse::build(self.status_code()).json(&error_response)
    }
}

/**
* Maps application errors to HTTP status codes.
*
* # Arguments
* `application_error`: The type of error that occurred.
*
* # Returns
* The corresponding HTTP status code.
*/
fn get_statuscode(application_error: &ErrorType) -> StatusCode {
    match application_error {
        ErrorType::Initialization => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorType::Backend | ErrorType::Registry | ErrorType::Decode => StatusCode::BAD_GATEWAY,
        ErrorType::Validation => StatusCode::BAD_REQUEST,
    }
}

/**
 * Maps application errors to error codes.
 *
 * # Arguments
 * `application_error`: The type of error that occurred.
 *
 * # Returns
 * The corresponding error code.
 */
fn get_error_code(application_error: &ErrorType) -> u16 {
    match application_error {
        ErrorType::Initialization => 1001,
        ErrorType::Backend => 1002,
        ErrorType::Decode => 1003,
        ErrorType::Validation => 1004,
        ErrorType::Registry => 1005,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn create_form(parish_code: &str, parish_infection_percent: &str, municipality: &str) -> ParishCreateForm {
        ParishCreateForm {
            parish_code: parish_code.to_string(),
            parish_name: "Storby".to_string(),
            parish_infection_percent: parish_infection_percent.to_string(),
            municipality: municipality.to_string(),
        }
    }

    #[test]
    fn test_create_form_sends_selected_value_verbatim() {
        let input = ParishCreateInputType::try_from(create_form("10", "12", "3")).unwrap();
        assert_eq!(input, ParishCreateInputType { code: 10, name: "Storby".to_string(), infection_percent: 12.0, municipality_id: 3 });
    }

    #[test]
    fn test_create_form_rejects_non_integer_code() {
        let error = ParishCreateInputType::try_from(create_form("1.5", "12", "3")).unwrap_err();
        assert_eq!(error.error_type, ErrorType::Validation);
    }

    #[test]
    fn test_create_form_rejects_missing_municipality() {
        let error = ParishCreateInputType::try_from(create_form("10", "12", "")).unwrap_err();
        assert_eq!(error.message, "municipality is required");
    }

    #[test]
    fn test_update_form_with_and_without_date() {
        let form = ParishUpdateForm { parish_code: "100".to_string(), parish_name: "Updated".to_string(), parish_infection_percent: "5".to_string(), parish_shutdown_date: String::new() };
        let input = ParishUpdateInputType::try_from((7, form)).unwrap();
        assert_eq!(input, ParishUpdateInputType { id: 7, code: 100, name: "Updated".to_string(), infection_percent: 5.0, shutdown_date: None });

        let form = ParishUpdateForm { parish_code: "100".to_string(), parish_name: "Updated".to_string(), parish_infection_percent: "5".to_string(), parish_shutdown_date: "2024-03-01".to_string() };
        let input = ParishUpdateInputType::try_from((7, form)).unwrap();
        assert_eq!(input.shutdown_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_update_form_rejects_invalid_date() {
        let form = ParishUpdateForm { parish_code: "100".to_string(), parish_name: "Updated".to_string(), parish_infection_percent: "5".to_string(), parish_shutdown_date: "01-03-2024".to_string() };
        assert!(ParishUpdateInputType::try_from((7, form)).is_err());
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(ApplicationError::new(ErrorType::Validation, String::new()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApplicationError::new(ErrorType::Registry, String::new()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApplicationError::new(ErrorType::Initialization, String::new()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
