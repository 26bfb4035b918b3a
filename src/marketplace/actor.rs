use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::accounts::{AccountType, UserId};

/// Header carrying the authenticated account id, set by the upstream gateway.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated account type (`teen`, `adult`, `admin`).
pub const ACCOUNT_TYPE_HEADER: &str = "x-account-type";

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub account_type: AccountType,
}

impl Actor {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ActorRejection> {
        let id = header_value(headers, USER_ID_HEADER)?;
        let account_type = header_value(headers, ACCOUNT_TYPE_HEADER)?
            .parse::<AccountType>()
            .map_err(|reason| ActorRejection::InvalidHeader {
                header: ACCOUNT_TYPE_HEADER,
                reason,
            })?;

        Ok(Self {
            id: UserId(id),
            account_type,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &'static str) -> Result<String, ActorRejection> {
    let value = headers
        .get(name)
        .ok_or(ActorRejection::MissingHeader(name))?
        .to_str()
        .map_err(|_| ActorRejection::InvalidHeader {
            header: name,
            reason: "not visible ASCII".to_string(),
        })?
        .trim();

    if value.is_empty() {
        return Err(ActorRejection::MissingHeader(name));
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorRejection {
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("invalid {header} header: {reason}")]
    InvalidHeader {
        header: &'static str,
        reason: String,
    },
}

impl IntoResponse for ActorRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ActorRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Actor::from_headers(&parts.headers)
    }
}
