//! Feed composition: home timeline, explore and per-author listings.

use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::DomainError;
use crate::domain::{Page, PageRequest, Post, User};
use crate::ports::{FollowRepository, PostRepository};

pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { posts, follows }
    }

    /// Posts by everyone `user` follows plus `user`'s own posts.
    ///
    /// Authors are collected into a set before querying, so a post matches at
    /// most once no matter how the follow graph looks. Follows pointing at
    /// accounts that no longer exist simply match nothing.
    pub async fn followed_posts(
        &self,
        user: &User,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let mut authors: BTreeSet<Uuid> = self
            .follows
            .followed_ids(user.id)
            .await?
            .into_iter()
            .collect();
        authors.insert(user.id);

        let authors: Vec<Uuid> = authors.into_iter().collect();
        tracing::debug!(
            user_id = %user.id,
            authors = authors.len(),
            page = page.page(),
            "Composing followed posts"
        );

        Ok(self.posts.find_by_authors(&authors, page).await?)
    }

    /// Every post on the site.
    pub async fn explore(&self, page: PageRequest) -> Result<Page<Post>, DomainError> {
        Ok(self.posts.find_all(page).await?)
    }

    /// Posts by a single author, for profile pages.
    pub async fn user_posts(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        Ok(self.posts.find_by_author(author_id, page).await?)
    }

    /// Publish a new post as `author`.
    pub async fn publish(&self, author: &User, body: &str) -> Result<Post, DomainError> {
        let body = Post::normalize_body(body)?;
        let post = self.posts.insert(Post::new(author.id, body)).await?;

        tracing::info!(user_id = %author.id, post_id = %post.id, "Post published");
        Ok(post)
    }
}
