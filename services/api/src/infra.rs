use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tasktaker::config::ListingConfig;
use tasktaker::marketplace::accounts::{AccountService, InMemoryAccountRepository};
use tasktaker::marketplace::jobs::{InMemoryJobRepository, JobService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Jobs = Arc<JobService<InMemoryJobRepository>>;
pub(crate) type Accounts = Arc<AccountService<InMemoryAccountRepository>>;

/// Wire the marketplace services onto fresh in-memory stores.
pub(crate) fn in_memory_services(listing: ListingConfig) -> (Jobs, Accounts) {
    let jobs = JobService::new(Arc::new(InMemoryJobRepository::default()), listing);
    let accounts =
        AccountService::new(Arc::new(InMemoryAccountRepository::default())).with_listing(listing);
    (Arc::new(jobs), Arc::new(accounts))
}
