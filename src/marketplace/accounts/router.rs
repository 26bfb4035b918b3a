use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ProfileUpdate, Registration, UserId};
use super::query::SearchUsersQuery;
use super::repository::AccountRepository;
use super::service::{AccountService, AccountServiceError};
use crate::marketplace::actor::Actor;
use crate::marketplace::repository::RepositoryError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatingRequest {
    pub rating: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerificationRequest {
    pub is_verified: bool,
}

pub fn account_router<R>(service: Arc<AccountService<R>>) -> Router
where
    R: AccountRepository + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<R>))
        .route("/api/v1/users/me", put(update_profile_handler::<R>))
        .route("/api/v1/users/search", get(search_handler::<R>))
        .route("/api/v1/users/:user_id", get(profile_handler::<R>))
        .route("/api/v1/users/:user_id/rate", post(rate_handler::<R>))
        .route("/api/v1/users/:user_id/verify", put(verify_handler::<R>))
        .with_state(service)
}

impl IntoResponse for AccountServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            AccountServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            AccountServiceError::AlreadyRegistered(_) | AccountServiceError::EmailTaken => {
                StatusCode::CONFLICT
            }
            AccountServiceError::SelfRating | AccountServiceError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AccountServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            AccountServiceError::Repository(err) => match err {
                RepositoryError::Conflict
                | RepositoryError::UniqueViolation(_)
                | RepositoryError::VersionConflict { .. } => {
                    StatusCode::CONFLICT
                }
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    actor: Actor,
    Json(registration): Json<Registration>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.register(&actor, registration) {
        Ok(profile) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User registered successfully", "user": profile })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    Query(query): Query<SearchUsersQuery>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.search(&query) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn profile_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.profile(&UserId(user_id)) {
        Ok(profile) => (StatusCode::OK, Json(json!({ "user": profile.public_view() }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_profile_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    actor: Actor,
    Json(update): Json<ProfileUpdate>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.update_profile(&actor, update) {
        Ok(profile) => (
            StatusCode::OK,
            Json(json!({ "message": "Profile updated successfully", "user": profile })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn rate_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    actor: Actor,
    Path(user_id): Path<String>,
    Json(request): Json<RatingRequest>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.rate(&actor, &UserId(user_id), request.rating) {
        Ok(profile) => (
            StatusCode::OK,
            Json(json!({ "message": "Rating submitted successfully", "rating": profile.rating })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn verify_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    actor: Actor,
    Path(user_id): Path<String>,
    Json(request): Json<VerificationRequest>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.set_verification(&actor, &UserId(user_id), request.is_verified) {
        Ok(profile) => (
            StatusCode::OK,
            Json(json!({ "message": "Verification status updated", "user": profile.public_view() })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
