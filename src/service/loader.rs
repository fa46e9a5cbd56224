use std::sync::Arc;

use tracing::instrument;

use crate::{
    model::{
        apperror::ApplicationError,
        models::{EditSurface, MunicipalityOption, MunicipalitySummary, Parish},
    },
    service::{editor::RecordEditor, fetcher::ReferenceFetcher, synchronizer::ReferenceSynchronizer},
};

/**
 * Snapshot of server state the parish page is rendered from.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ParishPage {
    pub parishes: Vec<Parish>,
    pub municipality_options: Vec<MunicipalityOption>,
    /**
     * Present while the edit overlay is open.
     */
    pub edit_surface: Option<EditSurface>,
}

/**
 * Runs the load sequence of the pages. Every load reads fresh state from the backend.
 */
pub struct PageLoader {
    fetcher: ReferenceFetcher,
    synchronizer: Arc<ReferenceSynchronizer>,
    editor: Arc<RecordEditor>,
}

impl PageLoader {
    pub fn new(fetcher: ReferenceFetcher, synchronizer: Arc<ReferenceSynchronizer>, editor: Arc<RecordEditor>) -> Self {
        PageLoader { fetcher, synchronizer, editor }
    }

    /**
     * Seeds municipalities, then reads parishes and dropdown options, then opens the edit overlay if requested.
     * The steps run one after the other.
     *
     * # Arguments
     * `edit_parish_id`: Parish the edit overlay is opened for.
     *
     * # Returns
     * A Result containing the `ParishPage` or the first `ApplicationError` encountered.
     */
    #[instrument(skip(self), fields(result))]
    pub async fn load_parish_page(&self, edit_parish_id: Option<i64>) -> Result<ParishPage, ApplicationError> {
        self.synchronizer.seed().await?;
        let parishes = self.fetcher.fetch_local_parishes().await?;
        let municipality_options = self.fetcher.fetch_municipality_options().await?;
        let edit_surface = match edit_parish_id {
            Some(parish_id) => Some(self.editor.open_edit_surface(parish_id).await?),
            None => None,
        };
        Ok(ParishPage { parishes, municipality_options, edit_surface })
    }

    /**
     * Reads the municipality summaries.
     */
    #[instrument(skip(self), fields(result))]
    pub async fn load_municipality_page(&self) -> Result<Vec<MunicipalitySummary>, ApplicationError> {
        self.fetcher.fetch_municipality_summaries().await
    }
}

#[cfg(test)]
mod test {
    use prometheus::IntCounter;

    use super::*;
    use crate::{
        model::config::SeedPolicy,
        service::testing::{BackendCall, FakeBackend, FakeRegistry, external_municipality, parish},
    };

    fn loader(backend: Arc<FakeBackend>, registry: Arc<FakeRegistry>) -> PageLoader {
        let fetcher = ReferenceFetcher::new(backend.clone(), registry);
        let synchronizer = ReferenceSynchronizer::new(fetcher.clone(), backend.clone(), SeedPolicy::EveryLoad, IntCounter::new("test_synchronizations", "test").unwrap());
        let editor = RecordEditor::new(fetcher.clone(), backend, IntCounter::new("test_mutations", "test").unwrap());
        PageLoader::new(fetcher, Arc::new(synchronizer), Arc::new(editor))
    }

    #[actix_web::test]
    async fn test_load_sequence_seeds_before_reading() {
        let backend = Arc::new(FakeBackend::with_parishes(vec![parish(1, 1, "Fjeldeby", 3.0, None)]));
        let registry = Arc::new(FakeRegistry::new(vec![external_municipality("Aarhus")]));
        let loader = loader(backend.clone(), registry);
        let page = loader.load_parish_page(None).await.unwrap();
        assert_eq!(page.parishes.len(), 1);
        assert_eq!(page.municipality_options.len(), 1);
        assert!(page.edit_surface.is_none());
        let calls = backend.calls();
        assert!(matches!(calls[0], BackendCall::AddMunicipalities(_)));
        assert_eq!(calls[1], BackendCall::GetAllParishes);
    }

    #[actix_web::test]
    async fn test_load_with_edit_opens_surface() {
        let backend = Arc::new(FakeBackend::with_parishes(vec![parish(7, 100, "Test", 5.0, None)]));
        let loader = loader(backend.clone(), Arc::new(FakeRegistry::new(vec![])));
        let page = loader.load_parish_page(Some(7)).await.unwrap();
        assert_eq!(page.edit_surface.unwrap().name, "Test");
        assert_eq!(backend.calls().last(), Some(&BackendCall::GetParishById(7)));
    }

    #[actix_web::test]
    async fn test_seed_failure_stops_load() {
        let backend = Arc::new(FakeBackend::failing());
        let loader = loader(backend.clone(), Arc::new(FakeRegistry::new(vec![])));
        assert!(loader.load_parish_page(None).await.is_err());
        assert_eq!(backend.calls().len(), 1);
    }
}
