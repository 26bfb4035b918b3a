use serde::Serialize;

use super::accounts::AccountType;
use super::actor::Actor;
use super::jobs::domain::Job;

/// Operations guarded by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobAction {
    Post,
    Apply,
    AcceptApplicant,
    UpdateStatus,
    Complete,
    Cancel,
    Delete,
}

impl JobAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Apply => "apply to",
            Self::AcceptApplicant => "accept applicants for",
            Self::UpdateStatus => "update the status of",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for JobAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("{required} account required to {action} a job")]
    AccountType {
        required: AccountType,
        action: JobAction,
    },
    #[error("only the job poster can {0} this job")]
    NotPoster(JobAction),
    #[error("only the job poster or assignee can {0} this job")]
    NotParticipant(JobAction),
    #[error("admin account required to change verification status")]
    NotAdmin,
}

/// Role and ownership rules for every mutating marketplace operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn authorize(
        &self,
        actor: &Actor,
        action: JobAction,
        job: &Job,
    ) -> Result<(), AccessDenied> {
        match action {
            JobAction::Post => require_account(actor, AccountType::Adult, action),
            JobAction::Apply => require_account(actor, AccountType::Teen, action),
            JobAction::AcceptApplicant | JobAction::Delete => {
                if job.is_poster(&actor.id) {
                    Ok(())
                } else {
                    Err(AccessDenied::NotPoster(action))
                }
            }
            JobAction::UpdateStatus | JobAction::Complete | JobAction::Cancel => {
                if job.is_poster(&actor.id) || job.is_assignee(&actor.id) {
                    Ok(())
                } else {
                    Err(AccessDenied::NotParticipant(action))
                }
            }
        }
    }

    /// Posting has no job to inspect yet, only the account type matters.
    pub fn authorize_post(&self, actor: &Actor) -> Result<(), AccessDenied> {
        require_account(actor, AccountType::Adult, JobAction::Post)
    }

    pub fn authorize_verification(&self, actor: &Actor) -> Result<(), AccessDenied> {
        if actor.account_type == AccountType::Admin {
            Ok(())
        } else {
            Err(AccessDenied::NotAdmin)
        }
    }
}

fn require_account(
    actor: &Actor,
    required: AccountType,
    action: JobAction,
) -> Result<(), AccessDenied> {
    if actor.account_type == required {
        Ok(())
    } else {
        Err(AccessDenied::AccountType { required, action })
    }
}
