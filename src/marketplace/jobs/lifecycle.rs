//! Status transitions and the applicant sub-workflow of a job aggregate.
//!
//! Every method either applies its whole transition or leaves the job untouched.

use chrono::{DateTime, Utc};

use super::domain::{Applicant, ApplicantStatus, Job, JobStatus};
use super::validation::ValidationError;
use crate::marketplace::accounts::UserId;
use crate::marketplace::policy::JobAction;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("cannot {action} a job that is {status}")]
    InvalidState { status: JobStatus, action: JobAction },
    #[error("user {0} has already applied for this job")]
    DuplicateApplication(UserId),
    #[error("the job poster cannot apply to their own job")]
    SelfApplication,
    #[error("applicant {0} not found on this job")]
    ApplicantNotFound(UserId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Job {
    pub fn add_applicant(
        &mut self,
        candidate: UserId,
        proposal: String,
        proposed_price: u32,
        now: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        self.require_status(&[JobStatus::Open], JobAction::Apply)?;

        if self.is_poster(&candidate) {
            return Err(LifecycleError::SelfApplication);
        }
        if self.applicant(&candidate).is_some() {
            return Err(LifecycleError::DuplicateApplication(candidate));
        }

        self.applicants.push(Applicant {
            user: candidate,
            proposal,
            proposed_price,
            applied_at: now,
            status: ApplicantStatus::Pending,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Assign the job to `candidate`, rejecting every other applicant.
    pub fn accept_applicant(
        &mut self,
        candidate: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        self.require_status(&[JobStatus::Open], JobAction::AcceptApplicant)?;

        if self.applicant(candidate).is_none() {
            return Err(LifecycleError::ApplicantNotFound(candidate.clone()));
        }

        for applicant in &mut self.applicants {
            applicant.status = if &applicant.user == candidate {
                ApplicantStatus::Accepted
            } else {
                ApplicantStatus::Rejected
            };
        }

        self.status = JobStatus::InProgress;
        self.assigned_to = Some(candidate.clone());
        self.actual_start_date = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn complete(&mut self, final_price: u32, now: DateTime<Utc>) -> Result<(), LifecycleError> {
        self.require_status(&[JobStatus::InProgress], JobAction::Complete)?;

        self.status = JobStatus::Completed;
        self.final_price = Some(final_price);
        self.actual_end_date = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Cancelling drops the assignment; the accepted applicant entry keeps the history.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), LifecycleError> {
        self.require_status(&[JobStatus::Open, JobStatus::InProgress], JobAction::Cancel)?;

        self.status = JobStatus::Cancelled;
        self.assigned_to = None;
        self.updated_at = now;
        Ok(())
    }

    pub fn ensure_deletable(&self) -> Result<(), LifecycleError> {
        self.require_status(&[JobStatus::Open], JobAction::Delete)
    }

    /// Route a requested target status through the transition table.
    pub fn apply_status_update(
        &mut self,
        target: JobStatus,
        final_price: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        match target {
            JobStatus::Completed => match final_price {
                Some(price) if price > 0 => self.complete(price, now),
                Some(_) => {
                    self.require_status(&[JobStatus::InProgress], JobAction::Complete)?;
                    Err(ValidationError::new("final_price", "final price must be positive").into())
                }
                None => {
                    self.require_status(&[JobStatus::InProgress], JobAction::Complete)?;
                    Err(ValidationError::new(
                        "final_price",
                        "a final price is required to complete a job",
                    )
                    .into())
                }
            },
            JobStatus::Cancelled => self.cancel(now),
            // Reaching in-progress needs an assignee, and open is never re-entered.
            JobStatus::InProgress | JobStatus::Open => Err(LifecycleError::InvalidState {
                status: self.status,
                action: JobAction::UpdateStatus,
            }),
        }
    }

    fn require_status(&self, allowed: &[JobStatus], action: JobAction) -> Result<(), LifecycleError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidState {
                status: self.status,
                action,
            })
        }
    }
}
