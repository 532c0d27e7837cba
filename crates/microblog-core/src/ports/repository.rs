use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Page, PageRequest, Post, User, UserPatch};
use crate::error::RepoError;

/// Generic repository trait for entities keyed by ID.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity, returning it as stored.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository - the identity half of the credential store.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Bulk lookup; ids with no matching user are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    /// Write only the columns set in `patch`, returning the stored user.
    /// Fails with `RepoError::NotFound` if there is no such user.
    async fn patch(&self, id: Uuid, patch: UserPatch) -> Result<User, RepoError>;
}

/// Post repository.
///
/// Every listing is ordered by timestamp descending, then by insertion
/// sequence descending, and sliced with offset pagination.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post; the store assigns `seq`.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    async fn find_by_author(&self, author_id: Uuid, page: PageRequest)
    -> Result<Page<Post>, RepoError>;

    /// Posts whose author is any member of `author_ids`.
    async fn find_by_authors(
        &self,
        author_ids: &[Uuid],
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    async fn find_all(&self, page: PageRequest) -> Result<Page<Post>, RepoError>;
}

/// Follower -> followed relation.
///
/// `follow` and `unfollow` are idempotent. Self-follow policy lives with the caller.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError>;

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError>;

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError>;

    /// Ids of every account `follower_id` follows.
    async fn followed_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    async fn followers_count(&self, user_id: Uuid) -> Result<u64, RepoError>;

    async fn following_count(&self, user_id: Uuid) -> Result<u64, RepoError>;
}
