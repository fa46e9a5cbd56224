use std::sync::Arc;

use prometheus::IntCounter;
use tracing::{debug, instrument};

use crate::{
    dao::backend::ParishBackend,
    model::{
        apperror::ApplicationError,
        models::{Decision, EditSurface, ParishCreateInputType, ParishUpdateInputType, Transition},
    },
    service::fetcher::ReferenceFetcher,
};

/**
 * Creates, edits and deletes parishes. Every completed mutation ends with a reload.
 */
pub struct RecordEditor {
    /**
     * Used to read the parish the edit overlay is opened for.
     */
    fetcher: ReferenceFetcher,
    backend: Arc<dyn ParishBackend>,
    /**
     * Counts mutations sent to the backend.
     */
    mutations: IntCounter,
}

impl RecordEditor {
    /**
     * Creates a new instance of `RecordEditor`.
     *
     * # Arguments
     * `fetcher`: Reads single parishes for the edit overlay.
     * `backend`: Receives the mutations.
     * `mutations`: Counter increased for every mutation sent.
     *
     * # Returns
     * A new instance of `RecordEditor`.
     */
    pub fn new(fetcher: ReferenceFetcher, backend: Arc<dyn ParishBackend>, mutations: IntCounter) -> Self {
        RecordEditor { fetcher, backend, mutations }
    }

    /**
     * Submits a new parish. The municipality id is sent as selected.
     */
    #[instrument(skip(self), fields(result))]
    pub async fn create_parish(&self, parish_create_input: ParishCreateInputType) -> Result<Transition, ApplicationError> {
        self.backend.create_parish(parish_create_input).await?;
        self.mutations.inc();
        Ok(Transition::Reload)
    }

    /**
     * Reads the parish and returns the values the edit overlay is pre-filled with.
     */
    #[instrument(skip(self), fields(result))]
    pub async fn open_edit_surface(&self, parish_id: i64) -> Result<EditSurface, ApplicationError> {
        let parish = self.fetcher.fetch_parish(parish_id).await?;
        Ok(EditSurface::from(parish))
    }

    /**
     * Submits the edited values and reloads, whatever the backend answered.
     */
    #[instrument(skip(self), fields(result))]
    pub async fn save_edit(&self, parish_update_input: ParishUpdateInputType) -> Result<Transition, ApplicationError> {
        self.backend.update_parish(parish_update_input).await?;
        self.mutations.inc();
        Ok(Transition::Reload)
    }

    /**
     * Closes the edit overlay without saving. Closing always reloads.
     */
    pub fn dismiss_edit(&self) -> Transition {
        Transition::Reload
    }

    /**
     * Deletes the parish once the user has accepted the confirmation.
     *
     * A declined confirmation sends nothing and keeps the page.
     */
    #[instrument(skip(self), fields(result))]
    pub async fn delete_parish(&self, parish_id: i64, decision: Decision) -> Result<Transition, ApplicationError> {
        if decision == Decision::Declined {
            debug!("Deletion of parish {} declined", parish_id);
            return Ok(Transition::Stay);
        }
        self.backend.delete_parish(parish_id).await?;
        self.mutations.inc();
        Ok(Transition::Reload)
    }

    /**
     * Asks the backend to replace its parishes with demo data.
     */
    #[instrument(skip(self), fields(result))]
    pub async fn add_demo_data(&self) -> Result<Transition, ApplicationError> {
        self.backend.add_demo_data().await?;
        self.mutations.inc();
        Ok(Transition::Reload)
    }
}
