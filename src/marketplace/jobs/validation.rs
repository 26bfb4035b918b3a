use chrono::{DateTime, Utc};

use super::domain::{Job, JobDraft, JobId, JobStatus, PaymentStatus};
use crate::marketplace::accounts::UserId;

/// Input rejected before it reaches the job aggregate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Field limits applied to drafts and proposals.
#[derive(Debug, Clone, PartialEq)]
pub struct JobLimits {
    pub title_max_chars: usize,
    pub description_max_chars: usize,
    pub proposal_max_chars: usize,
    pub budget_floor: u32,
    pub min_duration_hours: f32,
    pub max_duration_hours: f32,
}

impl Default for JobLimits {
    fn default() -> Self {
        Self {
            title_max_chars: 100,
            description_max_chars: 1000,
            proposal_max_chars: 500,
            budget_floor: 5,
            min_duration_hours: 0.5,
            max_duration_hours: 24.0,
        }
    }
}

/// Validates drafts and produces freshly opened job aggregates.
#[derive(Debug, Clone, Default)]
pub struct JobValidator {
    limits: JobLimits,
}

impl JobValidator {
    pub fn with_limits(limits: JobLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &JobLimits {
        &self.limits
    }

    pub fn create_job(
        &self,
        draft: JobDraft,
        posted_by: UserId,
        id: JobId,
        now: DateTime<Utc>,
    ) -> Result<Job, ValidationError> {
        let title = draft.title.trim().to_string();
        require_text("title", &title, self.limits.title_max_chars)?;
        require_text(
            "description",
            &draft.description,
            self.limits.description_max_chars,
        )?;

        let location = &draft.location;
        require_present("location.address", &location.address)?;
        require_present("location.city", &location.city)?;
        require_present("location.state", &location.state)?;
        require_present("location.zip_code", &location.zip_code)?;
        if let Some(coordinates) = location.coordinates {
            if !(-90.0..=90.0).contains(&coordinates.lat) {
                return Err(ValidationError::new(
                    "location.coordinates.lat",
                    "latitude must be between -90 and 90",
                ));
            }
            if !(-180.0..=180.0).contains(&coordinates.lng) {
                return Err(ValidationError::new(
                    "location.coordinates.lng",
                    "longitude must be between -180 and 180",
                ));
            }
        }

        let budget = draft.budget;
        if budget.min < self.limits.budget_floor {
            return Err(ValidationError::new(
                "budget.min",
                format!("must be at least {}", self.limits.budget_floor),
            ));
        }
        if budget.max < self.limits.budget_floor {
            return Err(ValidationError::new(
                "budget.max",
                format!("must be at least {}", self.limits.budget_floor),
            ));
        }
        if budget.min > budget.max {
            return Err(ValidationError::new(
                "budget",
                "minimum budget cannot be greater than maximum budget",
            ));
        }

        let hours = draft.estimated_duration_hours;
        if !hours.is_finite()
            || hours < self.limits.min_duration_hours
            || hours > self.limits.max_duration_hours
        {
            return Err(ValidationError::new(
                "estimated_duration_hours",
                format!(
                    "must be between {} and {} hours",
                    self.limits.min_duration_hours, self.limits.max_duration_hours
                ),
            ));
        }

        if draft.start_date < now {
            return Err(ValidationError::new(
                "start_date",
                "start date cannot be in the past",
            ));
        }
        if let Some(end_date) = draft.end_date {
            if end_date <= draft.start_date {
                return Err(ValidationError::new(
                    "end_date",
                    "end date must be after start date",
                ));
            }
        }

        Ok(Job {
            id,
            title,
            description: draft.description,
            category: draft.category,
            location: draft.location,
            budget,
            estimated_duration_hours: hours,
            urgency: draft.urgency,
            required_skills: clean_labels(draft.required_skills),
            images: draft.images,
            status: JobStatus::Open,
            posted_by,
            assigned_to: None,
            applicants: Vec::new(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            actual_start_date: None,
            actual_end_date: None,
            final_price: None,
            payment_status: PaymentStatus::Pending,
            is_active: true,
            views: 0,
            tags: clean_labels(draft.tags),
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Proposal text and price must be present before an application is recorded.
    pub fn validate_proposal(
        &self,
        proposal: &str,
        proposed_price: u32,
    ) -> Result<(), ValidationError> {
        require_text("proposal", proposal, self.limits.proposal_max_chars)?;
        if proposed_price == 0 {
            return Err(ValidationError::new(
                "proposed_price",
                "proposed price is required",
            ));
        }
        Ok(())
    }
}

fn require_present(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

fn require_text(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    require_present(field, value)?;
    if value.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max_chars} characters"),
        ));
    }
    Ok(())
}

fn clean_labels(labels: Vec<String>) -> Vec<String> {
    labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}
