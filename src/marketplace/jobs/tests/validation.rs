use super::common::*;
use chrono::Duration;

use crate::marketplace::jobs::domain::{Coordinates, JobId};
use crate::marketplace::jobs::validation::{JobLimits, JobValidator, ValidationError};

fn create(draft: crate::marketplace::jobs::domain::JobDraft) -> Result<(), ValidationError> {
    JobValidator::default()
        .create_job(draft, poster(), JobId("job-v".to_string()), fixed_now())
        .map(|_| ())
}

fn rejected_field(draft: crate::marketplace::jobs::domain::JobDraft) -> &'static str {
    create(draft).expect_err("draft rejected").field
}

#[test]
fn budget_min_above_max_is_rejected() {
    let mut draft = draft();
    draft.budget.min = 50;
    draft.budget.max = 40;

    let err = create(draft).expect_err("inverted budget");
    assert_eq!(err.field, "budget");
    assert!(err.to_string().contains("minimum budget"));
}

#[test]
fn equal_budget_bounds_are_accepted() {
    let mut draft = draft();
    draft.budget.min = 30;
    draft.budget.max = 30;
    assert!(create(draft).is_ok());
}

#[test]
fn budget_below_floor_is_rejected() {
    let mut draft = draft();
    draft.budget.min = 2;
    assert_eq!(rejected_field(draft), "budget.min");
}

#[test]
fn start_date_in_past_is_rejected() {
    let mut draft = draft();
    draft.start_date = fixed_now() - Duration::minutes(1);
    assert_eq!(rejected_field(draft), "start_date");
}

#[test]
fn end_date_must_follow_start_date() {
    let mut draft = draft();
    draft.end_date = Some(draft.start_date);
    assert_eq!(rejected_field(draft.clone()), "end_date");

    draft.end_date = Some(draft.start_date + Duration::hours(4));
    assert!(create(draft).is_ok());
}

#[test]
fn blank_required_text_is_rejected() {
    let mut blank_title = draft();
    blank_title.title = "   ".to_string();
    assert_eq!(rejected_field(blank_title), "title");

    let mut blank_city = draft();
    blank_city.location.city = String::new();
    assert_eq!(rejected_field(blank_city), "location.city");
}

#[test]
fn overlong_description_is_rejected() {
    let mut draft = draft();
    draft.description = "x".repeat(1001);
    assert_eq!(rejected_field(draft), "description");
}

#[test]
fn duration_outside_bounds_is_rejected() {
    let mut short = draft();
    short.estimated_duration_hours = 0.25;
    assert_eq!(rejected_field(short), "estimated_duration_hours");

    let mut long = draft();
    long.estimated_duration_hours = 25.0;
    assert_eq!(rejected_field(long), "estimated_duration_hours");

    let mut nan = draft();
    nan.estimated_duration_hours = f32::NAN;
    assert_eq!(rejected_field(nan), "estimated_duration_hours");
}

#[test]
fn coordinates_must_be_on_the_globe() {
    let mut draft = draft();
    draft.location.coordinates = Some(Coordinates {
        lat: 91.0,
        lng: 0.0,
    });
    assert_eq!(rejected_field(draft), "location.coordinates.lat");
}

#[test]
fn proposals_need_text_and_price() {
    let validator = JobValidator::default();
    assert!(validator.validate_proposal("I can help", 30).is_ok());
    assert_eq!(
        validator
            .validate_proposal("", 30)
            .expect_err("blank proposal")
            .field,
        "proposal"
    );
    assert_eq!(
        validator
            .validate_proposal("I can help", 0)
            .expect_err("missing price")
            .field,
        "proposed_price"
    );
    assert_eq!(
        validator
            .validate_proposal(&"y".repeat(501), 30)
            .expect_err("too long")
            .field,
        "proposal"
    );
}

#[test]
fn custom_limits_are_honoured() {
    let validator = JobValidator::with_limits(JobLimits {
        budget_floor: 25,
        ..JobLimits::default()
    });
    let err = validator
        .create_job(draft(), poster(), JobId("job-l".to_string()), fixed_now())
        .expect_err("below custom floor");
    assert_eq!(err.field, "budget.min");
}
