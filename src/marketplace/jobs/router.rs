use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

use super::domain::{JobDraft, JobId};
use super::lifecycle::LifecycleError;
use super::query::{ListJobsQuery, UserJobsQuery};
use super::repository::JobRepository;
use super::request::{AcceptApplicantRequest, ActionAck, ApplyRequest, StatusUpdateRequest};
use super::service::{JobService, JobServiceError};
use crate::marketplace::accounts::UserId;
use crate::marketplace::actor::Actor;
use crate::marketplace::repository::RepositoryError;

/// Router builder exposing the job lifecycle over HTTP.
pub fn job_router<R>(service: Arc<JobService<R>>) -> Router
where
    R: JobRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(get_handler::<R>).delete(delete_handler::<R>),
        )
        .route("/api/v1/jobs/:job_id/apply", post(apply_handler::<R>))
        .route(
            "/api/v1/jobs/:job_id/accept-applicant",
            post(accept_handler::<R>),
        )
        .route("/api/v1/jobs/:job_id/status", put(status_handler::<R>))
        .route("/api/v1/jobs/user/:user_id", get(user_jobs_handler::<R>))
        .with_state(service)
}

impl IntoResponse for JobServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            JobServiceError::JobNotFound(_) => StatusCode::NOT_FOUND,
            JobServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            JobServiceError::Lifecycle(err) => match err {
                LifecycleError::InvalidState { .. } => StatusCode::CONFLICT,
                LifecycleError::ApplicantNotFound(_) => StatusCode::NOT_FOUND,
                LifecycleError::DuplicateApplication(_)
                | LifecycleError::SelfApplication
                | LifecycleError::Validation(_) => StatusCode::BAD_REQUEST,
            },
            JobServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            JobServiceError::Repository(err) => match err {
                RepositoryError::Conflict
                | RepositoryError::UniqueViolation(_)
                | RepositoryError::VersionConflict { .. } => {
                    StatusCode::CONFLICT
                }
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    actor: Actor,
    Json(draft): Json<JobDraft>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.create_job(&actor, draft) {
        Ok(job) => {
            let payload = json!({ "message": "Job posted successfully", "job": job });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    Query(query): Query<ListJobsQuery>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.list_jobs(&query) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.get_job(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(json!({ "job": job }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn apply_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    actor: Actor,
    Path(job_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.apply(&actor, &JobId(job_id), request) {
        Ok(_) => ack("Application submitted successfully"),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn accept_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    actor: Actor,
    Path(job_id): Path<String>,
    Json(request): Json<AcceptApplicantRequest>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.accept_applicant(&actor, &JobId(job_id), &request.applicant_id) {
        Ok(_) => ack("Applicant accepted successfully"),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    actor: Actor,
    Path(job_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.update_status(&actor, &JobId(job_id), request) {
        Ok(_) => ack("Job status updated successfully"),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    actor: Actor,
    Path(job_id): Path<String>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.delete_job(&actor, &JobId(job_id)) {
        Ok(()) => ack("Job deleted successfully"),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn user_jobs_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    _actor: Actor,
    Path(user_id): Path<String>,
    Query(query): Query<UserJobsQuery>,
) -> Response
where
    R: JobRepository + 'static,
{
    match service.jobs_for_user(&UserId(user_id), &query) {
        Ok(jobs) => (StatusCode::OK, Json(json!({ "jobs": jobs }))).into_response(),
        Err(err) => err.into_response(),
    }
}

fn ack(message: &str) -> Response {
    (StatusCode::OK, Json(ActionAck::new(message))).into_response()
}
