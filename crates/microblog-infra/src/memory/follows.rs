use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use microblog_core::error::RepoError;
use microblog_core::ports::FollowRepository;

/// Set of (follower, followed) pairs. No referential checks against users.
#[derive(Default)]
pub struct InMemoryFollowRepository {
    pairs: RwLock<HashSet<(Uuid, Uuid)>>,
}

impl InMemoryFollowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pairs.
    pub async fn len(&self) -> usize {
        self.pairs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pairs.read().await.is_empty()
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError> {
        self.pairs.write().await.insert((follower_id, followed_id));
        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError> {
        self.pairs.write().await.remove(&(follower_id, followed_id));
        Ok(())
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .pairs
            .read()
            .await
            .contains(&(follower_id, followed_id)))
    }

    async fn followed_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let pairs = self.pairs.read().await;
        Ok(pairs
            .iter()
            .filter(|(follower, _)| *follower == follower_id)
            .map(|(_, followed)| *followed)
            .collect())
    }

    async fn followers_count(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let pairs = self.pairs.read().await;
        Ok(pairs.iter().filter(|(_, followed)| *followed == user_id).count() as u64)
    }

    async fn following_count(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let pairs = self.pairs.read().await;
        Ok(pairs.iter().filter(|(follower, _)| *follower == user_id).count() as u64)
    }
}
