use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use microblog_core::domain::{User, UserPatch};
use microblog_core::error::RepoError;
use microblog_core::ports::{BaseRepository, UserRepository};

/// User store keyed by id, enforcing unique usernames and emails.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(store: &HashMap<Uuid, User>, user: &User) -> Result<(), RepoError> {
        for other in store.values().filter(|u| u.id != user.id) {
            if other.username == user.username {
                return Err(RepoError::Constraint("Username already taken".to_string()));
            }
            if other.email == user.email {
                return Err(RepoError::Constraint("Email already registered".to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&user.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        Self::check_unique(&store, &user)?;

        store.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn patch(&self, id: Uuid, patch: UserPatch) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        let mut user = store.get(&id).cloned().ok_or(RepoError::NotFound)?;
        patch.apply(&mut user);
        Self::check_unique(&store, &user)?;

        store.insert(id, user.clone());
        Ok(user)
    }
}
