//! Job marketplace: the job aggregate and its lifecycle, account profiles, and the
//! policy deciding who may drive each transition.

pub mod accounts;
pub mod actor;
pub mod jobs;
pub mod page;
pub mod policy;
pub mod repository;

use std::sync::Arc;

use axum::Router;

pub use actor::Actor;
pub use jobs::validation::ValidationError;
pub use policy::{AccessDenied, AccessPolicy, JobAction};
pub use repository::RepositoryError;

/// Merge the job and account routers into one application router.
pub fn marketplace_router<J, A>(
    jobs: Arc<jobs::JobService<J>>,
    accounts: Arc<accounts::AccountService<A>>,
) -> Router
where
    J: jobs::JobRepository + 'static,
    A: accounts::AccountRepository + 'static,
{
    jobs::job_router(jobs).merge(accounts::account_router(accounts))
}
