use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::accounts::UserId;

/// Identifier wrapper for posted jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobCategory {
    LawnCare,
    Housekeeping,
    PetCare,
    Tutoring,
    Shopping,
    Organization,
    TechHelp,
    Other,
}

impl JobCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LawnCare => "lawn-care",
            Self::Housekeeping => "housekeeping",
            Self::PetCare => "pet-care",
            Self::Tutoring => "tutoring",
            Self::Shopping => "shopping",
            Self::Organization => "organization",
            Self::TechHelp => "tech-help",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Location {
    /// Case-insensitive match against city, state, or zip code.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [&self.city, &self.state, &self.zip_code]
            .iter()
            .any(|part| part.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    #[default]
    Fixed,
    Hourly,
}

/// Price range offered by the poster, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Budget {
    pub min: u32,
    pub max: u32,
    #[serde(default, rename = "type")]
    pub pricing: PricingType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Disputed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A candidate's proposal embedded in the job aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub user: UserId,
    pub proposal: String,
    pub proposed_price: u32,
    pub applied_at: DateTime<Utc>,
    pub status: ApplicantStatus,
}

/// Caller supplied fields for a new job, validated by `JobValidator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub category: JobCategory,
    pub location: Location,
    pub budget: Budget,
    pub estimated_duration_hours: f32,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The job aggregate: descriptive fields, applicants, and lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub category: JobCategory,
    pub location: Location,
    pub budget: Budget,
    pub estimated_duration_hours: f32,
    pub urgency: Urgency,
    pub required_skills: Vec<String>,
    pub images: Vec<String>,
    pub status: JobStatus,
    pub posted_by: UserId,
    pub assigned_to: Option<UserId>,
    pub applicants: Vec<Applicant>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub actual_start_date: Option<DateTime<Utc>>,
    pub actual_end_date: Option<DateTime<Utc>>,
    pub final_price: Option<u32>,
    pub payment_status: PaymentStatus,
    pub is_active: bool,
    pub views: u64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Job {
    pub fn applicant(&self, user: &UserId) -> Option<&Applicant> {
        self.applicants
            .iter()
            .find(|applicant| &applicant.user == user)
    }

    pub fn is_poster(&self, user: &UserId) -> bool {
        &self.posted_by == user
    }

    pub fn is_assignee(&self, user: &UserId) -> bool {
        self.assigned_to.as_ref() == Some(user)
    }

    /// Hours actually worked once both actual dates are known, otherwise the estimate.
    pub fn duration_hours(&self) -> f64 {
        match (self.actual_start_date, self.actual_end_date) {
            (Some(start), Some(end)) => (end - start).num_seconds() as f64 / 3600.0,
            _ => f64::from(self.estimated_duration_hours),
        }
    }

    pub fn summary(&self) -> JobSummaryView {
        JobSummaryView {
            id: self.id.clone(),
            title: self.title.clone(),
            category: self.category,
            city: self.location.city.clone(),
            state: self.location.state.clone(),
            budget: self.budget,
            status: self.status.label(),
            posted_by: self.posted_by.clone(),
            assigned_to: self.assigned_to.clone(),
            applicant_count: self.applicants.len(),
            start_date: self.start_date,
            created_at: self.created_at,
        }
    }
}

/// Trimmed listing representation; applicant proposals stay private to the poster.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummaryView {
    pub id: JobId,
    pub title: String,
    pub category: JobCategory,
    pub city: String,
    pub state: String,
    pub budget: Budget,
    pub status: &'static str,
    pub posted_by: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserId>,
    pub applicant_count: usize,
    pub start_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
