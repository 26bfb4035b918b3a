//! Job aggregate, lifecycle state machine, and the applicant sub-workflow.

pub mod domain;
pub mod lifecycle;
pub mod query;
pub mod repository;
pub mod request;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{
    Applicant, ApplicantStatus, Budget, Coordinates, Job, JobCategory, JobDraft, JobId,
    JobStatus, JobSummaryView, Location, PaymentStatus, PricingType, Urgency,
};
pub use lifecycle::LifecycleError;
pub use query::{JobFilter, JobPage, ListJobsQuery, SortField, SortOrder, UserJobRole, UserJobsQuery};
pub use repository::{InMemoryJobRepository, JobRepository};
pub use request::{AcceptApplicantRequest, ActionAck, ApplyRequest, StatusUpdateRequest};
pub use router::job_router;
pub use service::{JobService, JobServiceError};
pub use validation::{JobLimits, JobValidator, ValidationError};
