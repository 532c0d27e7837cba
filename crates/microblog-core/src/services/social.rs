//! Follow/unfollow policy on top of the follow relation.

use std::sync::Arc;

use crate::DomainError;
use crate::domain::User;
use crate::ports::{FollowRepository, UserRepository};

pub struct SocialService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl SocialService {
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    /// Make `actor` follow the user named `username`. Returns the target.
    pub async fn follow(&self, actor: &User, username: &str) -> Result<User, DomainError> {
        let target = self.target(actor, username).await?;
        self.follows.follow(actor.id, target.id).await?;

        tracing::info!(follower = %actor.id, followed = %target.id, "Follow");
        Ok(target)
    }

    /// Make `actor` stop following the user named `username`. Returns the target.
    pub async fn unfollow(&self, actor: &User, username: &str) -> Result<User, DomainError> {
        let target = self.target(actor, username).await?;
        self.follows.unfollow(actor.id, target.id).await?;

        tracing::info!(follower = %actor.id, followed = %target.id, "Unfollow");
        Ok(target)
    }

    pub async fn is_following(&self, actor: &User, target: &User) -> Result<bool, DomainError> {
        Ok(self.follows.is_following(actor.id, target.id).await?)
    }

    /// (followers, following) counts for a profile.
    pub async fn counts(&self, user: &User) -> Result<(u64, u64), DomainError> {
        let followers = self.follows.followers_count(user.id).await?;
        let following = self.follows.following_count(user.id).await?;
        Ok((followers, following))
    }

    async fn target(&self, actor: &User, username: &str) -> Result<User, DomainError> {
        let target = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::user_not_found(username))?;

        if target.id == actor.id {
            return Err(DomainError::SelfReferenceRejected);
        }

        Ok(target)
    }
}
