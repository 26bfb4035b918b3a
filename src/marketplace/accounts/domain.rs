use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a marketplace account as asserted by the authenticating gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Teen,
    Adult,
    Admin,
}

impl AccountType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Teen => "teen",
            Self::Adult => "adult",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "teen" => Ok(Self::Teen),
            "adult" => Ok(Self::Adult),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown account type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileLocation {
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

/// Running average of the 1-5 star ratings an account has received.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    pub average: f32,
    pub count: u32,
}

impl Rating {
    pub fn record(&mut self, score: u8) {
        let total = self.average * self.count as f32 + f32::from(score);
        self.count += 1;
        self.average = total / self.count as f32;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_type: AccountType,
    pub date_of_birth: NaiveDate,
    pub phone: Option<String>,
    pub location: Option<ProfileLocation>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub profile_picture: Option<String>,
    pub rating: Rating,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl UserProfile {
    pub fn public_view(&self) -> PublicProfileView {
        PublicProfileView {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            account_type: self.account_type,
            location: self.location.clone(),
            bio: self.bio.clone(),
            skills: self.skills.clone(),
            profile_picture: self.profile_picture.clone(),
            rating: self.rating,
            is_verified: self.is_verified,
        }
    }
}

/// Profile fields safe to show other marketplace members.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfileView {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub account_type: AccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ProfileLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub rating: Rating,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Registration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_type: AccountType,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<ProfileLocation>,
}

/// The only profile fields an account holder may change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<ProfileLocation>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Whole years between `date_of_birth` and `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years
}
