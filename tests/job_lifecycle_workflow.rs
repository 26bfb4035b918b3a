//! End-to-end scenarios for the job lifecycle driven through the public service facade and the
//! merged marketplace router.

mod common {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use axum::response::Response;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::Value;

    use tasktaker::config::ListingConfig;
    use tasktaker::marketplace::accounts::{
        AccountService, AccountType, InMemoryAccountRepository, UserId,
    };
    use tasktaker::marketplace::actor::{ACCOUNT_TYPE_HEADER, USER_ID_HEADER};
    use tasktaker::marketplace::jobs::{
        Budget, InMemoryJobRepository, JobCategory, JobDraft, JobService, Location, PricingType,
        Urgency,
    };
    use tasktaker::marketplace::Actor;

    pub(super) fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(super) fn actor(id: &str, account_type: AccountType) -> Actor {
        Actor {
            id: UserId(id.to_string()),
            account_type,
        }
    }

    pub(super) fn draft() -> JobDraft {
        JobDraft {
            title: "Walk two dogs".to_string(),
            description: "Two friendly labs, thirty minutes around the park.".to_string(),
            category: JobCategory::PetCare,
            location: Location {
                address: "400 Grand Avenue".to_string(),
                city: "Ames".to_string(),
                state: "IA".to_string(),
                zip_code: "50010".to_string(),
                coordinates: None,
            },
            budget: Budget {
                min: 15,
                max: 30,
                pricing: PricingType::Fixed,
            },
            estimated_duration_hours: 1.0,
            urgency: Urgency::High,
            required_skills: vec!["dogs".to_string()],
            images: Vec::new(),
            start_date: fixed_now() + Duration::hours(6),
            end_date: None,
            tags: Vec::new(),
        }
    }

    pub(super) fn jobs() -> Arc<JobService<InMemoryJobRepository>> {
        let repository = Arc::new(InMemoryJobRepository::default());
        Arc::new(JobService::new(repository, ListingConfig::default()).with_clock(fixed_now))
    }

    pub(super) fn accounts() -> Arc<AccountService<InMemoryAccountRepository>> {
        let repository = Arc::new(InMemoryAccountRepository::default());
        Arc::new(AccountService::new(repository).with_clock(fixed_now))
    }

    pub(super) fn request(
        method: Method,
        uri: &str,
        caller: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((user, account_type)) = caller {
            builder = builder
                .header(USER_ID_HEADER, user)
                .header(ACCOUNT_TYPE_HEADER, account_type);
        }
        let body = match body {
            Some(body) => {
                builder = builder.header("content-type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        builder.body(body).expect("request")
    }

    pub(super) async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }
}

use std::thread;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::*;
use tasktaker::marketplace::accounts::AccountType;
use tasktaker::marketplace::jobs::{
    ApplicantStatus, ApplyRequest, JobServiceError, JobStatus, LifecycleError,
};
use tasktaker::marketplace::{marketplace_router, RepositoryError};

#[test]
fn poster_hires_one_of_two_candidates_and_completes() {
    let jobs = jobs();
    let poster = actor("adult-7", AccountType::Adult);
    let first = actor("teen-jo", AccountType::Teen);
    let second = actor("teen-kai", AccountType::Teen);

    let job = jobs.create_job(&poster, draft()).expect("posted");
    for (candidate, price) in [(&first, 20), (&second, 18)] {
        jobs.apply(
            candidate,
            &job.id,
            ApplyRequest {
                proposal: "Happy to help".to_string(),
                proposed_price: price,
            },
        )
        .expect("application accepted");
    }

    let job = jobs
        .accept_applicant(&poster, &job.id, &second.id)
        .expect("second candidate hired");
    assert_eq!(job.status, JobStatus::InProgress);
    assert_eq!(job.assigned_to.as_ref(), Some(&second.id));
    assert_eq!(
        job.applicant(&first.id).map(|entry| entry.status),
        Some(ApplicantStatus::Rejected)
    );

    let done = jobs
        .complete_job(&second, &job.id, 18)
        .expect("assignee completes");
    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(done.final_price, Some(18));
    assert!(done.status.is_terminal());

    match jobs.cancel_job(&poster, &job.id) {
        Err(JobServiceError::Lifecycle(LifecycleError::InvalidState { status, .. })) => {
            assert_eq!(status, JobStatus::Completed);
        }
        other => panic!("completed job must stay completed, got {other:?}"),
    }
}

#[test]
fn racing_accepts_produce_exactly_one_assignee() {
    let jobs = jobs();
    let poster = actor("adult-7", AccountType::Adult);
    let job = jobs.create_job(&poster, draft()).expect("posted");

    let candidates: Vec<_> = (0..4)
        .map(|index| actor(&format!("teen-{index}"), AccountType::Teen))
        .collect();
    for candidate in &candidates {
        jobs.apply(
            candidate,
            &job.id,
            ApplyRequest {
                proposal: "Available".to_string(),
                proposed_price: 20,
            },
        )
        .expect("applied");
    }

    let handles: Vec<_> = candidates
        .iter()
        .map(|candidate| {
            let jobs = jobs.clone();
            let poster = poster.clone();
            let job_id = job.id.clone();
            let candidate_id = candidate.id.clone();
            thread::spawn(move || jobs.accept_applicant(&poster, &job_id, &candidate_id))
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        match handle.join().expect("thread completes") {
            Ok(job) => winners.push(job.assigned_to.expect("assignee set")),
            Err(JobServiceError::Repository(RepositoryError::VersionConflict { .. }))
            | Err(JobServiceError::Lifecycle(LifecycleError::InvalidState { .. })) => {}
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    assert_eq!(winners.len(), 1);
    let stored = jobs.get_job(&job.id).expect("job readable");
    assert_eq!(stored.assigned_to.as_ref(), Some(&winners[0]));
    assert_eq!(
        stored
            .applicants
            .iter()
            .filter(|entry| entry.status == ApplicantStatus::Accepted)
            .count(),
        1
    );
}

#[tokio::test]
async fn marketplace_router_serves_jobs_and_accounts() {
    let app = marketplace_router(jobs(), accounts());
    let poster = Some(("adult-7", "adult"));
    let teen = Some(("teen-jo", "teen"));

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/users",
            teen,
            Some(json!({
                "email": "jo@example.com",
                "first_name": "Jo",
                "last_name": "Park",
                "account_type": "teen",
                "date_of_birth": "2010-02-14"
            })),
        ))
        .await
        .expect("register response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let draft = serde_json::to_value(draft()).expect("draft json");
    let response = app
        .clone()
        .oneshot(request(Method::POST, "/api/v1/jobs", poster, Some(draft)))
        .await
        .expect("create response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let job_id = read_json_body(response).await["job"]["id"]
        .as_str()
        .expect("job id")
        .to_string();

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/jobs/{job_id}/apply"),
            teen,
            Some(json!({ "proposal": "Love dogs", "proposed_price": 20 })),
        ))
        .await
        .expect("apply response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/jobs/{job_id}/accept-applicant"),
            poster,
            Some(json!({ "applicant_id": "teen-jo" })),
        ))
        .await
        .expect("accept response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/api/v1/jobs/{job_id}/status"),
            poster,
            Some(json!({ "status": "completed" })),
        ))
        .await
        .expect("status response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/users/teen-jo/rate",
            poster,
            Some(json!({ "rating": 4 })),
        ))
        .await
        .expect("rate response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request(Method::GET, "/api/v1/jobs/user/teen-jo", teen, None))
        .await
        .expect("user jobs response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["jobs"][0]["status"], "in-progress");
}

#[tokio::test]
async fn user_search_is_served_over_http() {
    let app = marketplace_router(jobs(), accounts());

    for (id, email, born) in [
        ("teen-jo", "jo@example.com", "2010-02-14"),
        ("teen-kai", "kai@example.com", "2011-07-01"),
    ] {
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/v1/users",
                Some((id, "teen")),
                Some(json!({
                    "email": email,
                    "first_name": "Sam",
                    "last_name": "Lee",
                    "account_type": "teen",
                    "date_of_birth": born
                })),
            ))
            .await
            .expect("register response");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/users/teen-kai/rate",
            Some(("adult-7", "adult")),
            Some(json!({ "rating": 5 })),
        ))
        .await
        .expect("rate response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/v1/users/search?user_type=teen&limit=1",
            None,
            None,
        ))
        .await
        .expect("search response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["users"][0]["id"], "teen-kai");
    assert!(body["users"][0].get("email").is_none());

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/v1/users/search?userType=teen",
            None,
            None,
        ))
        .await
        .expect("search response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
