use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const MAX_BODY_LEN: usize = 140;

/// Post entity - a short, immutable status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Insertion counter assigned by the store; zero until persisted.
    pub seq: i64,
    pub user_id: Uuid,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl Post {
    /// Create a new post stamped with the current time.
    pub fn new(user_id: Uuid, body: String) -> Self {
        Self::at(user_id, body, Utc::now())
    }

    /// Create a new post with an explicit timestamp.
    pub fn at(user_id: Uuid, body: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            seq: 0,
            user_id,
            body,
            timestamp,
        }
    }

    /// Trim a submitted body and check its length bounds.
    pub fn normalize_body(body: &str) -> Result<String, DomainError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::Validation("Post body is required".to_string()));
        }
        if body.chars().count() > MAX_BODY_LEN {
            return Err(DomainError::Validation(format!(
                "Post body must be at most {MAX_BODY_LEN} characters"
            )));
        }
        Ok(body.to_string())
    }

    /// Feed ordering: newest timestamp first, later insertion first on ties.
    pub fn feed_order(a: &Post, b: &Post) -> std::cmp::Ordering {
        b.timestamp.cmp(&a.timestamp).then(b.seq.cmp(&a.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_normalize_body() {
        assert_eq!(Post::normalize_body("  hello  ").unwrap(), "hello");
        assert!(Post::normalize_body("   ").is_err());
        assert!(Post::normalize_body(&"é".repeat(MAX_BODY_LEN)).is_ok());
        assert!(Post::normalize_body(&"é".repeat(MAX_BODY_LEN + 1)).is_err());
    }

    #[test]
    fn test_feed_order_breaks_ties_by_seq() {
        let author = Uuid::new_v4();
        let t = Utc::now();

        let mut older = Post::at(author, "older".into(), t - TimeDelta::seconds(5));
        older.seq = 3;
        let mut first = Post::at(author, "first".into(), t);
        first.seq = 1;
        let mut second = Post::at(author, "second".into(), t);
        second.seq = 2;

        let mut posts = vec![older, first, second];
        posts.sort_by(Post::feed_order);

        let bodies: Vec<_> = posts.iter().map(|p| p.body.as_str()).collect();
        assert_eq!(bodies, vec!["second", "first", "older"]);
    }
}
