//! Application state - shared across all handlers.

use std::sync::Arc;

use microblog_core::domain::PageRequest;
use microblog_core::ports::{FollowRepository, PostRepository, TokenService, UserRepository};
use microblog_core::services::{AccountService, FeedService, SocialService};
use microblog_infra::database::DatabaseConnections;
use microblog_infra::{
    Argon2PasswordService, InMemoryFollowRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtConfig, JwtResetTokenService, JwtTokenService, LogResetNotifier,
};

#[cfg(feature = "postgres")]
use microblog_infra::database::{
    PostgresFollowRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub accounts: Arc<AccountService>,
    pub feed: Arc<FeedService>,
    pub social: Arc<SocialService>,
    pub tokens: Arc<dyn TokenService>,
    pub posts_per_page: u64,
    pub db: Option<Arc<DatabaseConnections>>,
}

/// The three stores every service is built from.
struct Repositories {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            follows: Arc::new(InMemoryFollowRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
            follows: Arc::new(PostgresFollowRepository::new(connections.main.clone())),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let jwt = JwtConfig::from_env();

        #[cfg(feature = "postgres")]
        let (db, repos) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let repos = Repositories::postgres(&connections);
                    (Some(Arc::new(connections)), repos)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, Repositories::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, Repositories::in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, repos) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (None, Repositories::in_memory())
        };

        let state = Self::assemble(repos, &jwt, config, db);
        tracing::info!("Application state initialized");
        state
    }

    /// State backed by fresh in-memory repositories.
    #[cfg(test)]
    pub fn in_memory(config: &AppConfig, jwt: &JwtConfig) -> Self {
        Self::assemble(Repositories::in_memory(), jwt, config, None)
    }

    fn assemble(
        repos: Repositories,
        jwt: &JwtConfig,
        config: &AppConfig,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        let accounts = AccountService::new(
            repos.users.clone(),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtResetTokenService::new(jwt)),
            Arc::new(LogResetNotifier::new(config.public_url.clone())),
        );
        let feed = FeedService::new(repos.posts.clone(), repos.follows.clone());
        let social = SocialService::new(repos.users.clone(), repos.follows.clone());

        Self {
            users: repos.users,
            accounts: Arc::new(accounts),
            feed: Arc::new(feed),
            social: Arc::new(social),
            tokens: Arc::new(JwtTokenService::new(jwt.clone())),
            posts_per_page: config.posts_per_page,
            db,
        }
    }

    /// Page request for a raw `?page=` value using the configured page size.
    pub fn page_request(&self, page: Option<i64>) -> PageRequest {
        PageRequest::new(page.unwrap_or(1), self.posts_per_page)
    }
}
