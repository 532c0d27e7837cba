//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    Set, Unchanged,
};
use uuid::Uuid;

use microblog_core::domain::{Page, PageRequest, Post, User, UserPatch};
use microblog_core::error::RepoError;
use microblog_core::ports::{BaseRepository, FollowRepository, PostRepository, UserRepository};

use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_err, write_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL follower relation.
pub type PostgresFollowRepository = PostgresBaseRepository<FollowEntity>;

/// Mask an email address for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***{domain}"),
                _ => format!("***{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn patch(&self, id: Uuid, patch: UserPatch) -> Result<User, RepoError> {
        let mut active = user::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(username) = patch.username {
            active.username = Set(username);
        }
        if let Some(about_me) = patch.about_me {
            active.about_me = Set(about_me);
        }
        if let Some(password_hash) = patch.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(last_seen) = patch.last_seen {
            active.last_seen = Set(last_seen.into());
        }

        if !active.is_changed() {
            return self.find_by_id(id).await?.ok_or(RepoError::NotFound);
        }

        let model = active.update(&self.db).await.map_err(write_err)?;
        Ok(model.into())
    }
}

impl PostgresPostRepository {
    /// Order a post query for feeds and slice out one page.
    ///
    /// Counts first; pages past the end skip the row fetch.
    async fn fetch_page(
        &self,
        select: Select<PostEntity>,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let paginator = select
            .order_by_desc(post::Column::Timestamp)
            .order_by_desc(post::Column::Seq)
            .paginate(&self.db, page.per_page());

        let total = paginator.num_items().await.map_err(query_err)?;
        if page.offset() >= total {
            return Ok(Page::new(Vec::new(), page, total));
        }

        let rows = paginator
            .fetch_page(page.page() - 1)
            .await
            .map_err(query_err)?;

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            page,
            total,
        ))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(post)
            .insert(&self.db)
            .await
            .map_err(write_err)?;

        Ok(model.into())
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let select = PostEntity::find().filter(post::Column::UserId.eq(author_id));
        self.fetch_page(select, page).await
    }

    async fn find_by_authors(
        &self,
        author_ids: &[Uuid],
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        if author_ids.is_empty() {
            return Ok(Page::empty(page));
        }

        let select =
            PostEntity::find().filter(post::Column::UserId.is_in(author_ids.iter().copied()));
        self.fetch_page(select, page).await
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        self.fetch_page(PostEntity::find(), page).await
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError> {
        let pair = follow::ActiveModel {
            follower_id: Set(follower_id),
            followed_id: Set(followed_id),
        };

        FollowEntity::insert(pair)
            .on_conflict(
                OnConflict::columns([follow::Column::FollowerId, follow::Column::FollowedId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_err)?;

        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), RepoError> {
        FollowEntity::delete_many()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowedId.eq(followed_id))
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        Ok(())
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError> {
        let pair = FollowEntity::find_by_id((follower_id, followed_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(pair.is_some())
    }

    async fn followed_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let pairs = FollowEntity::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(pairs.into_iter().map(|p| p.followed_id).collect())
    }

    async fn followers_count(&self, user_id: Uuid) -> Result<u64, RepoError> {
        FollowEntity::find()
            .filter(follow::Column::FollowedId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn following_count(&self, user_id: Uuid) -> Result<u64, RepoError> {
        FollowEntity::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("john@example.com"), "j***@example.com");
        assert_eq!(mask_email("j@example.com"), "***@example.com");
        assert_eq!(mask_email("nope"), "***");
    }
}
