use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const MAX_USERNAME_LEN: usize = 64;
pub const MAX_EMAIL_LEN: usize = 120;
pub const MAX_ABOUT_ME_LEN: usize = 140;
pub const MIN_PASSWORD_LEN: usize = 8;

/// User entity - an account that posts and follows other accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub about_me: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Column-scoped change to a stored user. `None` leaves a column untouched,
/// so concurrent writers of different columns never clobber each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub about_me: Option<Option<String>>,
    pub password_hash: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl UserPatch {
    /// Apply the set columns to `user`.
    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(about_me) = &self.about_me {
            user.about_me = about_me.clone();
        }
        if let Some(password_hash) = &self.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(last_seen) = self.last_seen {
            user.last_seen = last_seen;
        }
    }
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            about_me: None,
            last_seen: now,
            created_at: now,
        }
    }

    pub fn validate_username(username: &str) -> Result<(), DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::Validation("Username is required".to_string()));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(DomainError::Validation(format!(
                "Username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(DomainError::Validation(
                "Username must not contain whitespace".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_email(email: &str) -> Result<(), DomainError> {
        let valid = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        };
        if !valid || email.chars().count() > MAX_EMAIL_LEN {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }
        Ok(())
    }

    pub fn validate_password(password: &str) -> Result<(), DomainError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }

    pub fn validate_about_me(about_me: &str) -> Result<(), DomainError> {
        if about_me.chars().count() > MAX_ABOUT_ME_LEN {
            return Err(DomainError::Validation(format!(
                "About me must be at most {MAX_ABOUT_ME_LEN} characters"
            )));
        }
        Ok(())
    }
}
