//! Marketplace account profiles, ratings, and verification.

pub mod domain;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    age_on, AccountType, ProfileLocation, ProfileUpdate, PublicProfileView, Rating,
    Registration, UserId, UserProfile,
};
pub use query::{ProfileFilter, ProfilePage, SearchUsersQuery};
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use router::{account_router, RatingRequest, VerificationRequest};
pub use service::{AccountService, AccountServiceError};
