use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::ListingConfig;
use crate::marketplace::accounts::{AccountType, UserId};
use crate::marketplace::actor::Actor;
use crate::marketplace::jobs::domain::{
    Budget, Job, JobCategory, JobDraft, JobId, Location, PricingType, Urgency,
};
use crate::marketplace::jobs::query::JobFilter;
use crate::marketplace::jobs::repository::{InMemoryJobRepository, JobRepository};
use crate::marketplace::jobs::service::JobService;
use crate::marketplace::jobs::validation::JobValidator;
use crate::marketplace::repository::RepositoryError;

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn poster() -> UserId {
    UserId("adult-1".to_string())
}

pub(crate) fn teen(name: &str) -> UserId {
    UserId(format!("teen-{name}"))
}

pub(crate) fn poster_actor() -> Actor {
    Actor {
        id: poster(),
        account_type: AccountType::Adult,
    }
}

pub(crate) fn teen_actor(name: &str) -> Actor {
    Actor {
        id: teen(name),
        account_type: AccountType::Teen,
    }
}

pub(crate) fn location() -> Location {
    Location {
        address: "12 Maple Street".to_string(),
        city: "Des Moines".to_string(),
        state: "IA".to_string(),
        zip_code: "50309".to_string(),
        coordinates: None,
    }
}

pub(crate) fn draft() -> JobDraft {
    JobDraft {
        title: "  Mow the front lawn ".to_string(),
        description: "Front and back yard, mower provided.".to_string(),
        category: JobCategory::LawnCare,
        location: location(),
        budget: Budget {
            min: 20,
            max: 40,
            pricing: PricingType::Fixed,
        },
        estimated_duration_hours: 2.0,
        urgency: Urgency::Medium,
        required_skills: vec!["mowing".to_string(), "  ".to_string()],
        images: Vec::new(),
        start_date: fixed_now() + Duration::days(1),
        end_date: None,
        tags: vec!["outdoor".to_string()],
    }
}

pub(crate) fn open_job() -> Job {
    JobValidator::default()
        .create_job(draft(), poster(), JobId("job-test".to_string()), fixed_now())
        .expect("draft is valid")
}

/// Two applicants, `teen-a` accepted.
pub(crate) fn in_progress_job() -> Job {
    let mut job = open_job();
    job.add_applicant(teen("a"), "I have a mower".to_string(), 30, fixed_now())
        .expect("a applies");
    job.add_applicant(teen("b"), "Weekends free".to_string(), 25, fixed_now())
        .expect("b applies");
    job.accept_applicant(&teen("a"), fixed_now())
        .expect("a accepted");
    job
}

pub(crate) fn build_service() -> (JobService<InMemoryJobRepository>, Arc<InMemoryJobRepository>) {
    let repository = Arc::new(InMemoryJobRepository::default());
    let service =
        JobService::new(repository.clone(), ListingConfig::default()).with_clock(fixed_now);
    (service, repository)
}

pub(crate) struct UnavailableRepository;

impl JobRepository for UnavailableRepository {
    fn insert(&self, _job: Job) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_view(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _job: Job, _expected_version: u64) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &JobId, _expected_version: u64) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find(&self, _filter: &JobFilter) -> Result<Vec<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Serves a fixed snapshot while another writer has already moved the stored version on.
pub(crate) struct StaleRepository {
    pub(crate) snapshot: Job,
}

impl JobRepository for StaleRepository {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        Ok(job)
    }

    fn fetch(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(Some(self.snapshot.clone()))
    }

    fn record_view(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(Some(self.snapshot.clone()))
    }

    fn update(&self, _job: Job, expected_version: u64) -> Result<Job, RepositoryError> {
        Err(RepositoryError::VersionConflict {
            expected: expected_version,
            found: expected_version + 1,
        })
    }

    fn delete(&self, _id: &JobId, expected_version: u64) -> Result<(), RepositoryError> {
        Err(RepositoryError::VersionConflict {
            expected: expected_version,
            found: expected_version + 1,
        })
    }

    fn find(&self, _filter: &JobFilter) -> Result<Vec<Job>, RepositoryError> {
        Ok(vec![self.snapshot.clone()])
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
