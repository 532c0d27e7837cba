//! Registration, login, profile edits and password resets.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::DomainError;
use crate::domain::{User, UserPatch};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, PasswordService, ResetNotifier, ResetTokenService, UserRepository,
};

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    reset_tokens: Arc<dyn ResetTokenService>,
    notifier: Arc<dyn ResetNotifier>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        reset_tokens: Arc<dyn ResetTokenService>,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Self {
        Self {
            users,
            passwords,
            reset_tokens,
            notifier,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let username = username.trim();
        let email = email.trim();
        User::validate_username(username)?;
        User::validate_email(email)?;
        User::validate_password(password)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate(
                "Please use a different username".to_string(),
            ));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::Duplicate(
                "Please use a different email address".to_string(),
            ));
        }

        let password_hash = self.passwords.hash(password).map_err(internal)?;
        let user = self
            .users
            .insert(User::new(username.to_string(), email.to_string(), password_hash))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            return Err(DomainError::InvalidCredentials);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(internal)?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Load the user behind an authenticated request and record the visit.
    pub async fn resolve(&self, user_id: Uuid) -> Result<User, DomainError> {
        let touch = UserPatch {
            last_seen: Some(Utc::now()),
            ..UserPatch::default()
        };

        match self.users.patch(user_id, touch).await {
            Err(RepoError::NotFound) => Err(DomainError::Unauthorized),
            other => Ok(other?),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::user_not_found(username))
    }

    /// Change `user`'s username and about-me. Other columns are left as
    /// stored, even if `user` is stale.
    pub async fn update_profile(
        &self,
        user: &User,
        username: &str,
        about_me: Option<&str>,
    ) -> Result<User, DomainError> {
        let username = username.trim();
        User::validate_username(username)?;
        let about_me = about_me.map(str::trim).filter(|s| !s.is_empty());
        if let Some(about_me) = about_me {
            User::validate_about_me(about_me)?;
        }

        if username != user.username && self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate(
                "Please use a different username".to_string(),
            ));
        }

        let changes = UserPatch {
            username: Some(username.to_string()),
            about_me: Some(about_me.map(str::to_string)),
            ..UserPatch::default()
        };
        let user = self.users.patch(user.id, changes).await?;

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Issue a reset token for the account with `email`, if there is one.
    ///
    /// Succeeds whether or not the address is known.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), DomainError> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = self
            .reset_tokens
            .issue_reset_token(user.id)
            .map_err(internal)?;
        self.notifier
            .send_reset(&user, &token)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Password reset token issued");
        Ok(())
    }

    /// Set a new password using a reset token.
    ///
    /// A bad or expired token fails before any user lookup.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<User, DomainError> {
        let user_id = self
            .reset_tokens
            .verify_reset_token(token)
            .map_err(|_| DomainError::ExpiredOrInvalidToken)?;
        User::validate_password(password)?;

        let changes = UserPatch {
            password_hash: Some(self.passwords.hash(password).map_err(internal)?),
            ..UserPatch::default()
        };
        let user = match self.users.patch(user_id, changes).await {
            Err(RepoError::NotFound) => return Err(DomainError::ExpiredOrInvalidToken),
            other => other?,
        };

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(user)
    }
}

fn internal(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}
