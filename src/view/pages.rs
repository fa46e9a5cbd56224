use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::{
    model::models::{EditSurface, MunicipalityOption, MunicipalitySummary},
    service::loader::ParishPage,
    view::tables::{MunicipalityRow, MunicipalitySummaryTable, ParishRow, ParishTable, municipality_rows, parish_rows},
};

/**
 * Route closing the edit overlay.
 */
pub const CLOSE_EDIT_PATH: &str = "/close-edit";

const STYLE: &str = "\
nav > a { margin-right: 1em; }\
body { font-family: \"Noto Sans\", sans-serif; }\
.modal-holder { position: fixed; inset: 0; }\
.modal-backdrop { position: absolute; inset: 0; background: rgba(0, 0, 0, 0.4); }\
.modal-content { position: relative; margin: 10% auto; width: 40%; padding: 1em; background: white; }\
.close { float: right; }\
.parish-line { padding-left: 2em; }";

/**
 * Renders a component on a fresh virtual dom.
 *
 * # Arguments
 * `component`: The component to render.
 * `props`: Its properties.
 *
 * # Returns
 * The html of the component.
 */
pub fn render_component<P: Clone + 'static>(component: fn(P) -> Element, props: P) -> String {
    let mut virtual_dom = VirtualDom::new_with_props(component, props);
    virtual_dom.rebuild_in_place();
    dioxus_ssr::render(&virtual_dom)
}

fn document<P: Clone + 'static>(component: fn(P) -> Element, props: P) -> String {
    format!("<!DOCTYPE html>{}", render_component(component, props))
}

/**
 * Renders the parish page: navigation, create form, parish table and, if open, the edit overlay.
 */
pub fn parish_page(page: &ParishPage, today: NaiveDate) -> String {
    document(
        ParishPageView,
        ParishPageViewProps { rows: parish_rows(&page.parishes, today), municipality_options: page.municipality_options.clone(), edit_surface: page.edit_surface.clone() },
    )
}

/**
 * Renders the municipality summary page.
 */
pub fn municipality_page(municipalities: &[MunicipalitySummary]) -> String {
    document(MunicipalityPageView, MunicipalityPageViewProps { rows: municipality_rows(municipalities) })
}

#[component]
fn Layout(heading: String, children: Element) -> Element {
    rsx! {
        html { lang: "en",
            head {
                meta { charset: "utf-8" }
                title { "{heading}" }
                style { dangerous_inner_html: STYLE }
            }
            body {
                nav {
                    a { href: "/", "Parishes" }
                    a { href: "/municipals", "Municipalities" }
                }
                h1 { "{heading}" }
                {children}
            }
        }
    }
}

#[component]
fn ParishPageView(rows: Vec<ParishRow>, municipality_options: Vec<MunicipalityOption>, edit_surface: Option<EditSurface>) -> Element {
    rsx! {
        Layout { heading: "Parishes".to_string(),
            form { method: "post", action: "/demo-data",
                button { r#type: "submit", id: "demoData", class: "btn btn-secondary", "Add demo data" }
            }
            div { id: "createParishDiv",
                CreateForm { municipality_options }
            }
            ParishTable { rows }
            if let Some(edit_surface) = &edit_surface {
                EditOverlay { edit_surface: edit_surface.clone() }
            }
        }
    }
}

#[component]
fn MunicipalityPageView(rows: Vec<MunicipalityRow>) -> Element {
    rsx! {
        Layout { heading: "Municipalities".to_string(),
            MunicipalitySummaryTable { rows }
        }
    }
}

/**
 * Create form. The dropdown submits the municipality id of the selected option.
 */
#[component]
fn CreateForm(municipality_options: Vec<MunicipalityOption>) -> Element {
    rsx! {
        form { method: "post", action: "/parishes",
            label { "Parish code: "
                input { r#type: "number", name: "parishCode", id: "parishCode", class: "form-control", required: true }
            }
            label { "Parish name: "
                input { r#type: "text", name: "parishName", id: "parishName", class: "form-control", required: true }
            }
            label { "Infection percent: "
                input { r#type: "number", min: "0", max: "100", step: "any", name: "parishInfectionPercent", id: "parishInfectionPercent", class: "form-control", required: true }
            }
            label { "Municipality: "
                select { name: "municipality", id: "municipality", required: true,
                    option { value: "", disabled: true, selected: true, "Choose municipality:" }
                    for MunicipalityOption { municipality_id, name } in municipality_options {
                        option { value: "{municipality_id}", "{name}" }
                    }
                }
            }
            button { r#type: "submit", id: "createParishButton", class: "btn btn-primary", "Save" }
        }
    }
}

/**
 * Edit overlay pre-filled with the current values. The close link and the backdrop both leave the overlay.
 */
#[component]
fn EditOverlay(edit_surface: EditSurface) -> Element {
    let EditSurface { parish_id, code, name, infection_percent, shutdown_date } = edit_surface;
    let shutdown_date = shutdown_date.map(|date| date.to_string()).unwrap_or_default();
    rsx! {
        div { id: "modalholder", class: "modal-holder",
            a { class: "modal-backdrop", href: CLOSE_EDIT_PATH, "aria-label": "Close" }
            div { class: "modal-content",
                a { id: "close", class: "close", href: CLOSE_EDIT_PATH, "×" }
                form { method: "post", action: "/parishes/{parish_id}",
                    label { "Parish code: "
                        input { r#type: "number", name: "parishCode", id: "parishCodeUpdate", class: "form-control", value: "{code}", required: true }
                    }
                    label { "Parish name: "
                        input { r#type: "text", name: "parishName", id: "parishNameUpdate", class: "form-control", value: "{name}", required: true }
                    }
                    label { "Infection percent: "
                        input {
                            r#type: "number",
                            min: "0",
                            max: "100",
                            step: "any",
                            name: "parishInfectionPercent",
                            id: "parishInfectionPercentUpdate",
                            class: "form-control",
                            value: "{infection_percent}",
                            required: true,
                        }
                    }
                    label { "Shutdown date: "
                        input { r#type: "date", name: "parishShutdownDate", id: "parishShutdownDate", value: "{shutdown_date}" }
                    }
                    button { r#type: "submit", id: "saveParish", class: "btn btn-warning", "Save changes" }
                }
            }
        }
    }
}
