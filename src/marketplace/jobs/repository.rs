use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{Job, JobId};
use super::query::JobFilter;
use crate::marketplace::repository::{check_version, RepositoryError};

/// Storage abstraction for job aggregates.
///
/// `update` and `delete` are conditional writes: they succeed only while the stored
/// version still equals `expected_version`, and `update` bumps the version.
/// `record_view` increments the view counter in place and leaves `version` alone.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn record_view(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn update(&self, job: Job, expected_version: u64) -> Result<Job, RepositoryError>;
    fn delete(&self, id: &JobId, expected_version: u64) -> Result<(), RepositoryError>;
    fn find(&self, filter: &JobFilter) -> Result<Vec<Job>, RepositoryError>;
}

#[derive(Default, Clone)]
pub struct InMemoryJobRepository {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<JobId, Job>>, RepositoryError> {
        self.jobs
            .lock()
            .map_err(|_| RepositoryError::Unavailable("job store mutex poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|jobs| jobs.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobRepository for InMemoryJobRepository {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut jobs = self.lock()?;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn record_view(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let mut jobs = self.lock()?;
        Ok(jobs.get_mut(id).map(|stored| {
            stored.views += 1;
            stored.clone()
        }))
    }

    fn update(&self, mut job: Job, expected_version: u64) -> Result<Job, RepositoryError> {
        let mut jobs = self.lock()?;
        let stored = jobs.get_mut(&job.id).ok_or(RepositoryError::NotFound)?;
        check_version(expected_version, stored.version)?;

        // Views are counted outside the version guard; keep the stored tally.
        job.views = stored.views;
        job.version = expected_version + 1;
        *stored = job.clone();
        Ok(job)
    }

    fn delete(&self, id: &JobId, expected_version: u64) -> Result<(), RepositoryError> {
        let mut jobs = self.lock()?;
        let stored = jobs.get(id).ok_or(RepositoryError::NotFound)?;
        check_version(expected_version, stored.version)?;
        jobs.remove(id);
        Ok(())
    }

    fn find(&self, filter: &JobFilter) -> Result<Vec<Job>, RepositoryError> {
        Ok(self
            .lock()?
            .values()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect())
    }
}
