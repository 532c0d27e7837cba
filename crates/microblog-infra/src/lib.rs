//! # Microblog Infrastructure
//!
//! Concrete implementations of the ports defined in `microblog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT session/reset tokens + Argon2 password hashing

pub mod database;
pub mod memory;
pub mod notify;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::DatabaseConnections;
pub use memory::{InMemoryFollowRepository, InMemoryPostRepository, InMemoryUserRepository};
pub use notify::LogResetNotifier;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtResetTokenService, JwtTokenService};
