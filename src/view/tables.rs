use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::model::models::{MunicipalitySummary, Parish};

/**
 * Shown in the date column of parishes without a shutdown date.
 */
pub const NO_SHUTDOWN_DATE: &str = "No shutdown date";

const PARISH_HEADERS: [&str; 9] = ["Id", "Code", "Name", "Infection", "Shut down", "Shutdown date", "Municipality", "", ""];

const MUNICIPALITY_HEADERS: [&str; 3] = ["Municipality", "Infection", "Parishes"];

/**
 * Row of the parish table. Rows are identified by their position, not the parish id.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ParishRow {
    pub counter: usize,
    pub parish_id: i64,
    pub code: i32,
    pub name: String,
    pub infection_percent: String,
    /**
     * The checkbox is always disabled. It is checked only when the parish is shut down.
     */
    pub shutdown_checked: bool,
    pub shutdown_date: String,
    pub municipality: String,
    /**
     * Edit and delete controls, attached by the second pass.
     */
    pub actions: Option<RowActions>,
}

/**
 * Targets of the edit and delete controls of one row.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct RowActions {
    pub edit_href: String,
    pub delete_action: String,
    pub popover_id: String,
}

impl ParishRow {
    fn skeleton(counter: usize, parish: &Parish, today: NaiveDate) -> Self {
        ParishRow {
            counter,
            parish_id: parish.id,
            code: parish.code,
            name: parish.name.clone(),
            infection_percent: format!("{}%", parish.infection_percent),
            shutdown_checked: parish.shutdown_status(today).is_checked(),
            shutdown_date: parish.shutdown_date.map_or_else(|| NO_SHUTDOWN_DATE.to_string(), |date| date.to_string()),
            municipality: parish.municipality.name.clone(),
            actions: None,
        }
    }
}

impl RowActions {
    fn new(counter: usize, parish_id: i64) -> Self {
        RowActions { edit_href: format!("/?edit={parish_id}"), delete_action: format!("/parishes/{parish_id}/delete"), popover_id: format!("confirmDelete{counter}") }
    }
}

/**
 * Lays out the rows of the parish table.
 *
 * The row skeletons are built first. The edit and delete controls are then attached row by row.
 *
 * # Arguments
 * `parishes`: Parishes in backend order.
 * `today`: Reference date of the shutdown checkbox.
 */
pub fn parish_rows(parishes: &[Parish], today: NaiveDate) -> Vec<ParishRow> {
    let mut rows: Vec<ParishRow> = parishes.iter().enumerate().map(|(counter, parish)| ParishRow::skeleton(counter, parish, today)).collect();
    for row in &mut rows {
        row.actions = Some(RowActions::new(row.counter, row.parish_id));
    }
    rows
}

/**
 * Municipality with its aggregate infection percent, parish count and parish lines, ready to render.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityRow {
    pub counter: usize,
    pub name: String,
    pub total_infection_percent: String,
    pub parish_count: usize,
    pub parish_lines: Vec<String>,
}

pub fn municipality_rows(municipalities: &[MunicipalitySummary]) -> Vec<MunicipalityRow> {
    municipalities
        .iter()
        .enumerate()
        .map(|(counter, municipality)| MunicipalityRow {
            counter,
            name: municipality.name.clone(),
            total_infection_percent: format!("{:.1} %", municipality.total_infection_percent),
            parish_count: municipality.parishes.len(),
            parish_lines: municipality.parishes.iter().map(|parish| format!("Parish: {} - {}%", parish.name, parish.infection_percent)).collect(),
        })
        .collect()
}

#[component]
fn TableHeader(headers: Vec<&'static str>) -> Element {
    rsx! {
        thead {
            tr {
                for header in headers {
                    th { "scope": "col", "{header}" }
                }
            }
        }
    }
}

/**
 * Parish table. One row per parish, with the action cells `editParish{n}` and `deleteParish{n}`.
 */
#[component]
pub fn ParishTable(rows: Vec<ParishRow>) -> Element {
    rsx! {
        table { class: "table",
            TableHeader { headers: PARISH_HEADERS.to_vec() }
            tbody { id: "parishTableBody",
                for row in rows {
                    ParishTableRow { row }
                }
            }
        }
    }
}

#[component]
fn ParishTableRow(row: ParishRow) -> Element {
    let ParishRow { counter, parish_id, code, name, infection_percent, shutdown_checked, shutdown_date, municipality, actions } = row;
    rsx! {
        tr { id: "parishRow{counter}",
            th { "scope": "row", "{parish_id}" }
            td { "{code}" }
            td { "{name}" }
            td { "{infection_percent}" }
            td { id: "parishShutdownCheckboxColumn{counter}",
                if shutdown_checked {
                    input { r#type: "checkbox", disabled: true, checked: true }
                } else {
                    input { r#type: "checkbox", disabled: true }
                }
            }
            td { id: "parishShutdownDateColumn{counter}", "{shutdown_date}" }
            td { "{municipality}" }
            td { id: "editParish{counter}",
                if let Some(actions) = &actions {
                    a { class: "btn btn-warning", href: actions.edit_href.clone(), "Edit" }
                }
            }
            td { id: "deleteParish{counter}",
                if let Some(actions) = &actions {
                    DeleteControls { popover_id: actions.popover_id.clone(), delete_action: actions.delete_action.clone() }
                }
            }
        }
    }
}

/**
 * Delete button and the confirmation popover it opens. Cancelling the popover sends no request.
 */
#[component]
fn DeleteControls(popover_id: String, delete_action: String) -> Element {
    rsx! {
        button { r#type: "button", class: "btn btn-danger", "popovertarget": "{popover_id}", "Delete" }
        div { id: "{popover_id}", class: "confirm", "popover": "auto",
            p { "Delete this parish?" }
            form { method: "post", action: "{delete_action}",
                button { r#type: "submit", name: "decision", value: "accept", class: "btn btn-danger", "Delete" }
            }
            button { r#type: "button", class: "btn", "popovertarget": "{popover_id}", "popovertargetaction": "hide", "Cancel" }
        }
    }
}

/**
 * Municipality summary. Each municipality row is followed by the row `parishRow{n}` holding its parish lines.
 */
#[component]
pub fn MunicipalitySummaryTable(rows: Vec<MunicipalityRow>) -> Element {
    rsx! {
        table { class: "table",
            TableHeader { headers: MUNICIPALITY_HEADERS.to_vec() }
            tbody { id: "municipalTableBody",
                for row in rows {
                    MunicipalityTableRows { row }
                }
            }
        }
    }
}

#[component]
fn MunicipalityTableRows(row: MunicipalityRow) -> Element {
    let MunicipalityRow { counter, name, total_infection_percent, parish_count, parish_lines } = row;
    rsx! {
        tr { class: "municipality",
            td { "scope": "row", b { "{name}" } }
            td { "scope": "row", b { "{total_infection_percent}" } }
            td { "scope": "row", b { "{parish_count}" } }
        }
        tr { id: "parishRow{counter}", class: "parishes",
            td { "colspan": "3",
                for line in parish_lines {
                    div { class: "parish-line", "{line}" }
                }
            }
        }
    }
}
