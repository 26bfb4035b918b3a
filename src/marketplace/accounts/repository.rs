use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{UserId, UserProfile};
use super::query::ProfileFilter;
use crate::marketplace::repository::{check_version, RepositoryError};

/// Storage abstraction for account profiles; `update` is version guarded like jobs.
///
/// `insert` owns both uniqueness rules: an existing id is `Conflict`, an existing
/// email (case-insensitive) is `UniqueViolation("email")`.
pub trait AccountRepository: Send + Sync {
    fn insert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
    fn find(&self, filter: &ProfileFilter) -> Result<Vec<UserProfile>, RepositoryError>;
    fn update(
        &self,
        profile: UserProfile,
        expected_version: u64,
    ) -> Result<UserProfile, RepositoryError>;
}

#[derive(Default, Clone)]
pub struct InMemoryAccountRepository {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl InMemoryAccountRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, UserProfile>>, RepositoryError> {
        self.profiles
            .lock()
            .map_err(|_| RepositoryError::Unavailable("account store mutex poisoned".to_string()))
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn insert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        let mut profiles = self.lock()?;
        if profiles.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        if profiles
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&profile.email))
        {
            return Err(RepositoryError::UniqueViolation("email"));
        }
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn find(&self, filter: &ProfileFilter) -> Result<Vec<UserProfile>, RepositoryError> {
        Ok(self
            .lock()?
            .values()
            .filter(|profile| filter.matches(profile))
            .cloned()
            .collect())
    }

    fn update(
        &self,
        mut profile: UserProfile,
        expected_version: u64,
    ) -> Result<UserProfile, RepositoryError> {
        let mut profiles = self.lock()?;
        let stored = profiles
            .get_mut(&profile.id)
            .ok_or(RepositoryError::NotFound)?;
        check_version(expected_version, stored.version)?;

        profile.version = expected_version + 1;
        *stored = profile.clone();
        Ok(profile)
    }
}
