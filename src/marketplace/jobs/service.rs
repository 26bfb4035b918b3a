use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::domain::{Job, JobDraft, JobId, JobStatus, JobSummaryView};
use super::lifecycle::LifecycleError;
use super::query::{paginate, sort_jobs, JobPage, ListJobsQuery, SortField, SortOrder, UserJobsQuery};
use super::repository::JobRepository;
use super::request::{ApplyRequest, StatusUpdateRequest};
use super::validation::{JobValidator, ValidationError};
use crate::config::ListingConfig;
use crate::marketplace::accounts::UserId;
use crate::marketplace::actor::Actor;
use crate::marketplace::policy::{AccessDenied, AccessPolicy, JobAction};
use crate::marketplace::repository::RepositoryError;

/// Service composing validation, the access policy, and version-guarded storage.
///
/// Each mutation is one read-modify-write cycle; a concurrent writer surfaces as
/// `RepositoryError::VersionConflict` instead of a lost update.
pub struct JobService<R> {
    repository: Arc<R>,
    validator: JobValidator,
    policy: AccessPolicy,
    listing: ListingConfig,
    clock: fn() -> DateTime<Utc>,
}

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

impl<R> JobService<R>
where
    R: JobRepository + 'static,
{
    pub fn new(repository: Arc<R>, listing: ListingConfig) -> Self {
        Self {
            repository,
            validator: JobValidator::default(),
            policy: AccessPolicy,
            listing,
            clock: Utc::now,
        }
    }

    pub fn with_validator(mut self, validator: JobValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn create_job(&self, actor: &Actor, draft: JobDraft) -> Result<Job, JobServiceError> {
        self.policy.authorize_post(actor)?;

        let job = self
            .validator
            .create_job(draft, actor.id.clone(), next_job_id(), (self.clock)())?;
        let stored = self.repository.insert(job)?;

        info!(job_id = %stored.id, poster = %stored.posted_by, category = stored.category.label(), "job posted");
        Ok(stored)
    }

    /// Fetch a job and count the view without touching its version.
    pub fn get_job(&self, id: &JobId) -> Result<Job, JobServiceError> {
        let job = self
            .repository
            .record_view(id)?
            .ok_or_else(|| JobServiceError::JobNotFound(id.clone()))?;
        debug!(job_id = %id, views = job.views, "job viewed");
        Ok(job)
    }

    pub fn list_jobs(&self, query: &ListJobsQuery) -> Result<JobPage, JobServiceError> {
        let jobs = self.repository.find(&query.filter())?;
        Ok(paginate(jobs, query, &self.listing))
    }

    /// Jobs a user posted or is assigned to, newest first.
    pub fn jobs_for_user(
        &self,
        user: &UserId,
        query: &UserJobsQuery,
    ) -> Result<Vec<JobSummaryView>, JobServiceError> {
        let mut jobs = self.repository.find(&query.filter(user))?;
        sort_jobs(&mut jobs, SortField::CreatedAt, SortOrder::Desc);
        Ok(jobs.iter().map(Job::summary).collect())
    }

    pub fn apply(
        &self,
        actor: &Actor,
        job_id: &JobId,
        request: ApplyRequest,
    ) -> Result<Job, JobServiceError> {
        self.validator
            .validate_proposal(&request.proposal, request.proposed_price)?;

        let job = self.mutate(actor, job_id, JobAction::Apply, |job, now| {
            job.add_applicant(
                actor.id.clone(),
                request.proposal,
                request.proposed_price,
                now,
            )
        })?;

        info!(job_id = %job.id, applicant = %actor.id, "application submitted");
        Ok(job)
    }

    pub fn accept_applicant(
        &self,
        actor: &Actor,
        job_id: &JobId,
        applicant: &UserId,
    ) -> Result<Job, JobServiceError> {
        let job = self.mutate(actor, job_id, JobAction::AcceptApplicant, |job, now| {
            job.accept_applicant(applicant, now)
        })?;

        info!(job_id = %job.id, assignee = %applicant, "applicant accepted");
        Ok(job)
    }

    pub fn update_status(
        &self,
        actor: &Actor,
        job_id: &JobId,
        request: StatusUpdateRequest,
    ) -> Result<Job, JobServiceError> {
        let action = match request.status {
            JobStatus::Completed => JobAction::Complete,
            JobStatus::Cancelled => JobAction::Cancel,
            JobStatus::Open | JobStatus::InProgress => JobAction::UpdateStatus,
        };

        let job = self.mutate(actor, job_id, action, |job, now| {
            job.apply_status_update(request.status, request.final_price, now)
        })?;

        info!(job_id = %job.id, actor = %actor.id, status = %job.status, "job status updated");
        Ok(job)
    }

    pub fn complete_job(
        &self,
        actor: &Actor,
        job_id: &JobId,
        final_price: u32,
    ) -> Result<Job, JobServiceError> {
        self.update_status(
            actor,
            job_id,
            StatusUpdateRequest {
                status: JobStatus::Completed,
                final_price: Some(final_price),
            },
        )
    }

    pub fn cancel_job(&self, actor: &Actor, job_id: &JobId) -> Result<Job, JobServiceError> {
        self.update_status(
            actor,
            job_id,
            StatusUpdateRequest {
                status: JobStatus::Cancelled,
                final_price: None,
            },
        )
    }

    pub fn delete_job(&self, actor: &Actor, job_id: &JobId) -> Result<(), JobServiceError> {
        let job = self.load(job_id)?;
        self.policy.authorize(actor, JobAction::Delete, &job)?;
        job.ensure_deletable()?;

        self.repository.delete(job_id, job.version)?;
        info!(job_id = %job_id, actor = %actor.id, "job deleted");
        Ok(())
    }

    fn load(&self, id: &JobId) -> Result<Job, JobServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| JobServiceError::JobNotFound(id.clone()))
    }

    fn mutate<F>(
        &self,
        actor: &Actor,
        job_id: &JobId,
        action: JobAction,
        transition: F,
    ) -> Result<Job, JobServiceError>
    where
        F: FnOnce(&mut Job, DateTime<Utc>) -> Result<(), LifecycleError>,
    {
        let mut job = self.load(job_id)?;
        self.policy.authorize(actor, action, &job)?;

        let expected_version = job.version;
        transition(&mut job, (self.clock)())?;

        self.repository
            .update(job, expected_version)
            .map_err(|err| {
                if let RepositoryError::VersionConflict { expected, found } = &err {
                    warn!(job_id = %job_id, expected, found, action = action.label(), "rejected stale job write");
                }
                err.into()
            })
    }
}

/// Error raised by the job service.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
