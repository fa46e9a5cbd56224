use std::sync::Arc;

use prometheus::IntCounter;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::{
    dao::backend::ParishBackend,
    model::{apperror::ApplicationError, config::SeedPolicy, models::MunicipalityAddInputType},
    service::fetcher::{ReferenceFetcher, distinct_municipalities},
};

/**
 * Seeds the backend with the municipalities of the address registry.
 */
pub struct ReferenceSynchronizer {
    fetcher: ReferenceFetcher,
    backend: Arc<dyn ParishBackend>,
    seed_policy: SeedPolicy,
    /**
     * Set after the first successful seed. Held for the whole seed so concurrent first loads send one bulk insert.
     */
    seeded: Mutex<bool>,
    /**
     * Counts bulk inserts sent to the backend.
     */
    synchronizations: IntCounter,
}

impl ReferenceSynchronizer {
    pub fn new(fetcher: ReferenceFetcher, backend: Arc<dyn ParishBackend>, seed_policy: SeedPolicy, synchronizations: IntCounter) -> Self {
        ReferenceSynchronizer { fetcher, backend, seed_policy, seeded: Mutex::new(false), synchronizations }
    }

    /**
     * Runs the seed as part of a page load, honouring the seed policy.
     */
    pub async fn seed(&self) -> Result<(), ApplicationError> {
        if self.seed_policy == SeedPolicy::EveryLoad {
            return self.synchronize_municipalities().await;
        }
        let mut seeded = self.seeded.lock().await;
        if *seeded {
            debug!("Municipalities already seeded by this process");
            return Ok(());
        }
        self.synchronize_municipalities().await?;
        *seeded = true;
        Ok(())
    }

    /**
     * Fetches the registry listing, projects every entry to its name and submits the list as one bulk insert.
     *
     * Repeated names are sent once. The outcome of the bulk insert is not inspected.
     */
    #[instrument(skip(self), fields(result))]
    pub async fn synchronize_municipalities(&self) -> Result<(), ApplicationError> {
        let external_municipalities = self.fetcher.fetch_external_municipalities().await?;
        let municipalities: Vec<MunicipalityAddInputType> = distinct_municipalities(&external_municipalities).into_iter().map(MunicipalityAddInputType::from).collect();
        info!("Submitting {} municipalities to the backend", municipalities.len());
        self.backend.add_municipalities(municipalities).await?;
        self.synchronizations.inc();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::service::testing::{BackendCall, FakeBackend, FakeRegistry, external_municipality};

    fn synchronizer(backend: Arc<FakeBackend>, registry: Arc<FakeRegistry>, seed_policy: SeedPolicy) -> ReferenceSynchronizer {
        let fetcher = ReferenceFetcher::new(backend.clone(), registry);
        ReferenceSynchronizer::new(fetcher, backend, seed_policy, IntCounter::new("test_synchronizations", "test").unwrap())
    }

    fn names(names: &[&str]) -> Vec<MunicipalityAddInputType> {
        names.iter().map(|name| MunicipalityAddInputType { name: (*name).to_string() }).collect()
    }

    #[actix_web::test]
    async fn test_bulk_insert_has_one_entry_per_municipality_in_order() {
        let backend = Arc::new(FakeBackend::default());
        let registry = Arc::new(FakeRegistry::new(vec![external_municipality("Vejle"), external_municipality("Aarhus"), external_municipality("Odense")]));
        let synchronizer = synchronizer(backend.clone(), registry, SeedPolicy::EveryLoad);
        synchronizer.synchronize_municipalities().await.unwrap();
        assert_eq!(backend.calls(), vec![BackendCall::AddMunicipalities(names(&["Vejle", "Aarhus", "Odense"]))]);
        assert_eq!(synchronizer.synchronizations.get(), 1);
    }

    #[actix_web::test]
    async fn test_repeated_names_are_sent_once() {
        let backend = Arc::new(FakeBackend::default());
        let registry = Arc::new(FakeRegistry::new(vec![external_municipality("Aarhus"), external_municipality("Aarhus"), external_municipality("Odense")]));
        let synchronizer = synchronizer(backend.clone(), registry, SeedPolicy::EveryLoad);
        synchronizer.synchronize_municipalities().await.unwrap();
        assert_eq!(backend.calls(), vec![BackendCall::AddMunicipalities(names(&["Aarhus", "Odense"]))]);
    }

    #[actix_web::test]
    async fn test_every_load_seeds_each_time() {
        let backend = Arc::new(FakeBackend::default());
        let registry = Arc::new(FakeRegistry::new(vec![external_municipality("Aarhus")]));
        let synchronizer = synchronizer(backend.clone(), registry.clone(), SeedPolicy::EveryLoad);
        synchronizer.seed().await.unwrap();
        synchronizer.seed().await.unwrap();
        assert_eq!(backend.calls().len(), 2);
        assert_eq!(registry.call_count(), 2);
    }

    #[actix_web::test]
    async fn test_once_per_process_seeds_once() {
        let backend = Arc::new(FakeBackend::default());
        let registry = Arc::new(FakeRegistry::new(vec![external_municipality("Aarhus")]));
        let synchronizer = synchronizer(backend.clone(), registry.clone(), SeedPolicy::OncePerProcess);
        synchronizer.seed().await.unwrap();
        synchronizer.seed().await.unwrap();
        assert_eq!(backend.calls().len(), 1);
        assert_eq!(registry.call_count(), 1);
    }

    #[actix_web::test]
    async fn test_concurrent_first_loads_seed_once() {
        let backend = Arc::new(FakeBackend::default());
        let registry = Arc::new(FakeRegistry::new(vec![external_municipality("Aarhus")]).with_delay(Duration::from_millis(20)));
        let synchronizer = synchronizer(backend.clone(), registry.clone(), SeedPolicy::OncePerProcess);
        let (first, second) = tokio::join!(synchronizer.seed(), synchronizer.seed());
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(backend.calls(), vec![BackendCall::AddMunicipalities(names(&["Aarhus"]))]);
        assert_eq!(registry.call_count(), 1);
        assert_eq!(synchronizer.synchronizations.get(), 1);
    }

    #[actix_web::test]
    async fn test_failed_seed_is_retried_on_next_load() {
        let backend = Arc::new(FakeBackend::failing());
        let registry = Arc::new(FakeRegistry::new(vec![external_municipality("Aarhus")]));
        let synchronizer = synchronizer(backend.clone(), registry, SeedPolicy::OncePerProcess);
        assert!(synchronizer.seed().await.is_err());
        assert!(synchronizer.seed().await.is_err());
        assert_eq!(backend.calls().len(), 2);
        assert_eq!(synchronizer.synchronizations.get(), 0);
    }
}
