use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use microblog_core::domain::{Page, PageRequest, Post};
use microblog_core::error::RepoError;
use microblog_core::ports::PostRepository;

#[derive(Default)]
struct Inner {
    posts: Vec<Post>,
    next_seq: i64,
}

/// Append-only post store.
#[derive(Default)]
pub struct InMemoryPostRepository {
    inner: RwLock<Inner>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn page_where(
        &self,
        page: PageRequest,
        keep: impl Fn(&Post) -> bool,
    ) -> Result<Page<Post>, RepoError> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Post> = inner.posts.iter().filter(|p| keep(p)).cloned().collect();
        drop(inner);

        matching.sort_by(Post::feed_order);
        Ok(Page::from_ordered(matching, page))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut inner = self.inner.write().await;
        if inner.posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        inner.next_seq += 1;
        post.seq = inner.next_seq;
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        self.page_where(page, |p| p.user_id == author_id).await
    }

    async fn find_by_authors(
        &self,
        author_ids: &[Uuid],
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let authors: HashSet<Uuid> = author_ids.iter().copied().collect();
        self.page_where(page, |p| authors.contains(&p.user_id)).await
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        self.page_where(page, |_| true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    #[tokio::test]
    async fn test_insert_assigns_increasing_seq() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();

        let a = repo.insert(Post::new(author, "a".into())).await.unwrap();
        let b = repo.insert(Post::new(author, "b".into())).await.unwrap();

        assert!(a.seq > 0);
        assert!(b.seq > a.seq);
    }

    #[tokio::test]
    async fn test_find_all_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let t1 = Utc::now() - TimeDelta::minutes(10);
        let t2 = t1 + TimeDelta::minutes(1);
        let t3 = t2 + TimeDelta::minutes(1);

        for (body, t) in [("t3", t3), ("t1", t1), ("t2", t2)] {
            repo.insert(Post::at(author, body.into(), t)).await.unwrap();
        }

        let page = repo.find_all(PageRequest::first(10)).await.unwrap();
        let bodies: Vec<_> = page.items.iter().map(|p| p.body.as_str()).collect();
        assert_eq!(bodies, vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn test_find_by_authors_empty_set() {
        let repo = InMemoryPostRepository::new();
        repo.insert(Post::new(Uuid::new_v4(), "x".into()))
            .await
            .unwrap();

        let page = repo
            .find_by_authors(&[], PageRequest::first(10))
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }
}
