use serde::{Deserialize, Serialize};

use super::domain::{Job, JobCategory, JobStatus, JobSummaryView};
use crate::config::ListingConfig;
use crate::marketplace::accounts::UserId;
use crate::marketplace::page::PageWindow;

/// Predicate pushed down to the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub category: Option<JobCategory>,
    pub location: Option<String>,
    pub min_budget: Option<u32>,
    pub max_budget: Option<u32>,
    pub active_only: bool,
    pub posted_by: Option<UserId>,
    pub assigned_to: Option<UserId>,
    /// Matches jobs the user either posted or is assigned to.
    pub participant: Option<UserId>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if self.active_only && !job.is_active {
            return false;
        }
        if self.status.is_some_and(|status| status != job.status) {
            return false;
        }
        if self.category.is_some_and(|category| category != job.category) {
            return false;
        }
        if let Some(location) = &self.location {
            if !job.location.matches(location) {
                return false;
            }
        }
        if self.min_budget.is_some_and(|min| job.budget.min < min) {
            return false;
        }
        if self.max_budget.is_some_and(|max| job.budget.max > max) {
            return false;
        }
        if let Some(poster) = &self.posted_by {
            if !job.is_poster(poster) {
                return false;
            }
        }
        if let Some(assignee) = &self.assigned_to {
            if !job.is_assignee(assignee) {
                return false;
            }
        }
        if let Some(user) = &self.participant {
            if !job.is_poster(user) && !job.is_assignee(user) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Budget,
    StartDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query string accepted by the public job listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListJobsQuery {
    #[serde(default)]
    pub category: Option<JobCategory>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_budget: Option<u32>,
    #[serde(default)]
    pub max_budget: Option<u32>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl ListJobsQuery {
    /// Listings default to open, active jobs.
    pub fn filter(&self) -> JobFilter {
        JobFilter {
            status: Some(self.status.unwrap_or(JobStatus::Open)),
            category: self.category,
            location: self
                .location
                .as_ref()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            min_budget: self.min_budget,
            max_budget: self.max_budget,
            active_only: true,
            ..JobFilter::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserJobRole {
    Posted,
    Assigned,
    #[default]
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserJobsQuery {
    #[serde(default, rename = "type")]
    pub role: UserJobRole,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

impl UserJobsQuery {
    pub fn filter(&self, user: &UserId) -> JobFilter {
        let mut filter = JobFilter {
            status: self.status,
            ..JobFilter::default()
        };
        match self.role {
            UserJobRole::Posted => filter.posted_by = Some(user.clone()),
            UserJobRole::Assigned => filter.assigned_to = Some(user.clone()),
            UserJobRole::All => filter.participant = Some(user.clone()),
        }
        filter
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobPage {
    pub jobs: Vec<JobSummaryView>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total: usize,
}

pub fn sort_jobs(jobs: &mut [Job], field: SortField, order: SortOrder) {
    jobs.sort_by(|a, b| {
        let ordering = match field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Budget => (a.budget.min, a.budget.max).cmp(&(b.budget.min, b.budget.max)),
            SortField::StartDate => a.start_date.cmp(&b.start_date),
        }
        .then_with(|| a.id.cmp(&b.id));

        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Sort, then cut one page out of the matching jobs.
pub fn paginate(mut jobs: Vec<Job>, query: &ListJobsQuery, config: &ListingConfig) -> JobPage {
    sort_jobs(&mut jobs, query.sort_by, query.sort_order);

    let window = PageWindow::new(jobs.len(), query.page, query.limit, config);
    JobPage {
        jobs: window.slice(&jobs).map(Job::summary).collect(),
        total_pages: window.total_pages,
        current_page: window.current_page,
        total: window.total,
    }
}
