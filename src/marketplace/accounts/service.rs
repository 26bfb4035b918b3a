use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{age_on, AccountType, ProfileUpdate, Rating, Registration, UserId, UserProfile};
use super::query::{paginate_profiles, ProfilePage, SearchUsersQuery};
use super::repository::AccountRepository;
use crate::config::ListingConfig;
use crate::marketplace::actor::Actor;
use crate::marketplace::policy::{AccessDenied, AccessPolicy};
use crate::marketplace::repository::RepositoryError;
use crate::marketplace::ValidationError;

const TEEN_AGE_RANGE: std::ops::RangeInclusive<i32> = 13..=19;
const ADULT_MIN_AGE: i32 = 18;
const BIO_MAX_CHARS: usize = 500;

/// Profile registration, updates, ratings, and verification.
pub struct AccountService<R> {
    repository: Arc<R>,
    policy: AccessPolicy,
    listing: ListingConfig,
    clock: fn() -> DateTime<Utc>,
}

impl<R> AccountService<R>
where
    R: AccountRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            policy: AccessPolicy,
            listing: ListingConfig::default(),
            clock: Utc::now,
        }
    }

    pub fn with_listing(mut self, listing: ListingConfig) -> Self {
        self.listing = listing;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Create the profile for the authenticated caller.
    pub fn register(
        &self,
        actor: &Actor,
        registration: Registration,
    ) -> Result<UserProfile, AccountServiceError> {
        let now = (self.clock)();
        validate_registration(actor, &registration, now)?;

        let email = registration.email.trim().to_string();
        let profile = UserProfile {
            id: actor.id.clone(),
            email,
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            account_type: registration.account_type,
            date_of_birth: registration.date_of_birth,
            phone: registration.phone,
            location: registration.location,
            bio: None,
            skills: Vec::new(),
            profile_picture: None,
            rating: Rating::default(),
            is_verified: false,
            is_active: true,
            created_at: now,
            updated_at: now,
            version: 0,
        };

        let stored = self.repository.insert(profile).map_err(|err| match err {
            RepositoryError::Conflict => AccountServiceError::AlreadyRegistered(actor.id.clone()),
            RepositoryError::UniqueViolation("email") => AccountServiceError::EmailTaken,
            other => other.into(),
        })?;

        info!(user_id = %stored.id, account_type = %stored.account_type, "account registered");
        Ok(stored)
    }

    pub fn profile(&self, id: &UserId) -> Result<UserProfile, AccountServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| AccountServiceError::NotFound(id.clone()))
    }

    /// Active profiles matching the query, best rated first.
    pub fn search(&self, query: &SearchUsersQuery) -> Result<ProfilePage, AccountServiceError> {
        let profiles = self.repository.find(&query.filter()?)?;
        Ok(paginate_profiles(profiles, query, &self.listing))
    }

    pub fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AccountServiceError> {
        if update.is_empty() {
            return Err(ValidationError::new("profile", "no updatable fields supplied").into());
        }

        let mut profile = self.profile(&actor.id)?;
        let expected_version = profile.version;

        if let Some(first_name) = update.first_name {
            profile.first_name = required_name("first_name", first_name)?;
        }
        if let Some(last_name) = update.last_name {
            profile.last_name = required_name("last_name", last_name)?;
        }
        if let Some(bio) = update.bio {
            if bio.chars().count() > BIO_MAX_CHARS {
                return Err(ValidationError::new(
                    "bio",
                    format!("must be at most {BIO_MAX_CHARS} characters"),
                )
                .into());
            }
            profile.bio = Some(bio);
        }
        if update.phone.is_some() {
            profile.phone = update.phone;
        }
        if update.location.is_some() {
            profile.location = update.location;
        }
        if let Some(skills) = update.skills {
            profile.skills = skills
                .into_iter()
                .map(|skill| skill.trim().to_string())
                .filter(|skill| !skill.is_empty())
                .collect();
        }
        if update.profile_picture.is_some() {
            profile.profile_picture = update.profile_picture;
        }
        profile.updated_at = (self.clock)();

        Ok(self.repository.update(profile, expected_version)?)
    }

    pub fn rate(
        &self,
        actor: &Actor,
        target: &UserId,
        score: u8,
    ) -> Result<UserProfile, AccountServiceError> {
        if !(1..=5).contains(&score) {
            return Err(ValidationError::new("rating", "rating must be between 1 and 5").into());
        }
        if &actor.id == target {
            return Err(AccountServiceError::SelfRating);
        }

        let mut profile = self.profile(target)?;
        let expected_version = profile.version;
        profile.rating.record(score);
        profile.updated_at = (self.clock)();

        let stored = self.repository.update(profile, expected_version)?;
        info!(user_id = %target, rater = %actor.id, score, "rating recorded");
        Ok(stored)
    }

    pub fn set_verification(
        &self,
        actor: &Actor,
        target: &UserId,
        is_verified: bool,
    ) -> Result<UserProfile, AccountServiceError> {
        self.policy.authorize_verification(actor)?;

        let mut profile = self.profile(target)?;
        let expected_version = profile.version;
        profile.is_verified = is_verified;
        profile.updated_at = (self.clock)();

        let stored = self.repository.update(profile, expected_version)?;
        info!(user_id = %target, admin = %actor.id, is_verified, "verification updated");
        Ok(stored)
    }
}

fn validate_registration(
    actor: &Actor,
    registration: &Registration,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    let email = registration.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ValidationError::new("email", "a valid email address is required"));
    }
    required_name("first_name", registration.first_name.clone())?;
    required_name("last_name", registration.last_name.clone())?;

    if registration.account_type != actor.account_type {
        return Err(ValidationError::new(
            "account_type",
            "must match the authenticated account type",
        ));
    }

    let age = age_on(registration.date_of_birth, now.date_naive());
    match registration.account_type {
        AccountType::Teen if !TEEN_AGE_RANGE.contains(&age) => Err(ValidationError::new(
            "date_of_birth",
            "teens must be between 13-19 years old",
        )),
        AccountType::Adult if age < ADULT_MIN_AGE => Err(ValidationError::new(
            "date_of_birth",
            "adults must be 18 years or older",
        )),
        AccountType::Admin => Err(ValidationError::new(
            "account_type",
            "admin accounts cannot self-register",
        )),
        _ => Ok(()),
    }
}

fn required_name(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error("user {0} not found")]
    NotFound(UserId),
    #[error("user {0} is already registered")]
    AlreadyRegistered(UserId),
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("cannot rate yourself")]
    SelfRating,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
