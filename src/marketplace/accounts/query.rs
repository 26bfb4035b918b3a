use serde::{Deserialize, Serialize};

use super::domain::{AccountType, PublicProfileView, UserProfile};
use crate::config::ListingConfig;
use crate::marketplace::page::PageWindow;
use crate::marketplace::ValidationError;

/// Predicate pushed down to the account repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFilter {
    pub account_type: Option<AccountType>,
    /// Case-insensitive substring of the profile's city or state.
    pub location: Option<String>,
    /// Matches profiles listing any of these skills.
    pub skills: Vec<String>,
    pub min_rating: Option<f32>,
    pub active_only: bool,
}

impl ProfileFilter {
    pub fn matches(&self, profile: &UserProfile) -> bool {
        if self.active_only && !profile.is_active {
            return false;
        }
        if self.account_type.is_some_and(|kind| kind != profile.account_type) {
            return false;
        }
        if let Some(needle) = &self.location {
            let needle = needle.to_lowercase();
            let found = profile.location.as_ref().is_some_and(|location| {
                location.city.to_lowercase().contains(&needle)
                    || location.state.to_lowercase().contains(&needle)
            });
            if !found {
                return false;
            }
        }
        if !self.skills.is_empty()
            && !profile.skills.iter().any(|skill| {
                self.skills
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(skill))
            })
        {
            return false;
        }
        if self
            .min_rating
            .is_some_and(|min| profile.rating.average < min)
        {
            return false;
        }
        true
    }
}

/// Query string accepted by the user search.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchUsersQuery {
    #[serde(default)]
    pub user_type: Option<AccountType>,
    #[serde(default)]
    pub location: Option<String>,
    /// Comma-separated skill names.
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub min_rating: Option<f32>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SearchUsersQuery {
    /// Searches only ever return active profiles.
    pub fn filter(&self) -> Result<ProfileFilter, ValidationError> {
        if let Some(min) = self.min_rating {
            if !(0.0..=5.0).contains(&min) {
                return Err(ValidationError::new(
                    "min_rating",
                    "must be between 0 and 5",
                ));
            }
        }

        Ok(ProfileFilter {
            account_type: self.user_type,
            location: self
                .location
                .as_ref()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            skills: self
                .skills
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(|skill| skill.trim().to_string())
                .filter(|skill| !skill.is_empty())
                .collect(),
            min_rating: self.min_rating,
            active_only: true,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub users: Vec<PublicProfileView>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total: usize,
}

/// Highest average first, then most ratings, then id.
pub fn sort_profiles(profiles: &mut [UserProfile]) {
    profiles.sort_by(|a, b| {
        b.rating
            .average
            .total_cmp(&a.rating.average)
            .then_with(|| b.rating.count.cmp(&a.rating.count))
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub fn paginate_profiles(
    mut profiles: Vec<UserProfile>,
    query: &SearchUsersQuery,
    config: &ListingConfig,
) -> ProfilePage {
    sort_profiles(&mut profiles);

    let window = PageWindow::new(profiles.len(), query.page, query.limit, config);
    ProfilePage {
        users: window.slice(&profiles).map(UserProfile::public_view).collect(),
        total_pages: window.total_pages,
        current_page: window.current_page,
        total: window.total,
    }
}
