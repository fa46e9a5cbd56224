use std::sync::Arc;

use crate::service::{editor::RecordEditor, loader::PageLoader};

/**
* Represents the application state shared across the Actix web application.
*/
pub struct AppState {
    /**
     * Runs the load sequence of the pages.
     */
    pub page_loader: PageLoader,
    /**
     * Runs the create, edit and delete workflows.
     */
    pub record_editor: Arc<RecordEditor>,
}

/**
 * Creates a new instance of `AppState`.
 *
 * # Arguments
 * `page_loader`: Runs the load sequence of the pages.
 * `record_editor`: Runs the create, edit and delete workflows.
 */
impl AppState {
    pub fn new(page_loader: PageLoader, record_editor: Arc<RecordEditor>) -> Self {
        AppState { page_loader, record_editor }
    }
}
