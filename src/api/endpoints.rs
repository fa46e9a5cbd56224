use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{ContentType, LOCATION},
    post,
    web::{self, Path},
};
use chrono::Utc;
use tracing::{Instrument, instrument};

use crate::{
    api::{
        rest::{ParishCreateForm, ParishDeleteForm, ParishPageQuery, ParishUpdateForm},
        state::AppState,
    },
    model::{
        apperror::ApplicationError,
        models::{Decision, ParishCreateInputType, ParishUpdateInputType, Transition},
    },
    view::pages,
};

/**
 * Parish page. Seeds municipalities and renders the parish table, with the edit overlay when `edit` is given.
 */
#[instrument(skip(http_request, query, app_state), fields(service = "parishPage", trace_id = get_trace_id(&http_request), result))]
#[get("/")]
pub async fn parish_page(http_request: HttpRequest, query: web::Query<ParishPageQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let page = app_state.page_loader.load_parish_page(query.edit).instrument(span).await?;
    Ok(html_response(pages::parish_page(&page, Utc::now().date_naive())))
}

/**
 * Municipality summary page.
 */
#[instrument(skip(http_request, app_state), fields(service = "municipalityPage", trace_id = get_trace_id(&http_request), result))]
#[get("/municipals")]
pub async fn municipality_page(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let municipalities = app_state.page_loader.load_municipality_page().instrument(span).await?;
    Ok(html_response(pages::municipality_page(&municipalities)))
}

/**
 * Create a parish from the create form.
 */
#[instrument(skip(http_request, form, app_state), fields(service = "createParish", trace_id = get_trace_id(&http_request), result))]
#[post("/parishes")]
pub async fn parish_create(http_request: HttpRequest, form: web::Form<ParishCreateForm>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let parish_create_input = ParishCreateInputType::try_from(form.into_inner())?.validate()?;
    let transition = app_state.record_editor.create_parish(parish_create_input).instrument(span).await?;
    Ok(transition_response(transition))
}

/**
 * Save the edit overlay.
 */
#[instrument(skip(http_request, form, app_state), fields(service = "updateParish", trace_id = get_trace_id(&http_request), result))]
#[post("/parishes/{parishId}")]
pub async fn parish_update(path: Path<i64>, http_request: HttpRequest, form: web::Form<ParishUpdateForm>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let parish_id = path.into_inner();
    let parish_update_input = ParishUpdateInputType::try_from((parish_id, form.into_inner()))?.validate()?;
    let transition = app_state.record_editor.save_edit(parish_update_input).instrument(span).await?;
    Ok(transition_response(transition))
}

/**
 * Close the edit overlay without saving.
 */
#[instrument(skip(http_request, app_state), fields(service = "closeEdit", trace_id = get_trace_id(&http_request)))]
#[get("/close-edit")]
pub async fn edit_close(http_request: HttpRequest, app_state: web::Data<AppState>) -> HttpResponse {
    transition_response(app_state.record_editor.dismiss_edit())
}

/**
 * Delete a parish once the confirmation has been answered.
 */
#[instrument(skip(http_request, form, app_state), fields(service = "deleteParish", trace_id = get_trace_id(&http_request), result))]
#[post("/parishes/{parishId}/delete")]
pub async fn parish_delete(path: Path<i64>, http_request: HttpRequest, form: web::Form<ParishDeleteForm>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let parish_id = path.into_inner();
    let decision = Decision::from(form.decision);
    let transition = app_state.record_editor.delete_parish(parish_id, decision).instrument(span).await?;
    Ok(transition_response(transition))
}

/**
 * Ask the backend for demo parishes.
 */
#[instrument(skip(http_request, app_state), fields(service = "addDemoData", trace_id = get_trace_id(&http_request), result))]
#[post("/demo-data")]
pub async fn demo_data_add(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let transition = app_state.record_editor.add_demo_data().instrument(span).await?;
    Ok(transition_response(transition))
}

fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

/**
 * A reload redirects to the parish page, which runs the whole load sequence again. Staying answers without content
 * so the browser keeps the current page.
 */
fn transition_response(transition: Transition) -> HttpResponse {
    match transition {
        Transition::Reload => HttpResponse::SeeOther().insert_header((LOCATION, "/")).finish(),
        Transition::Stay => HttpResponse::NoContent().finish(),
    }
}

/**
 * Retrieves the trace ID from the HTTP request headers.
 * If the trace ID is not present, a new UUID is generated.
 */
fn get_trace_id(http_request: &HttpRequest) -> String {
    http_request.headers().get("X-Trace-ID").and_then(|v| v.to_str().ok().map(std::string::ToString::to_string)).unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
