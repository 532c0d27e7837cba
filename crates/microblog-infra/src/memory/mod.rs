//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Note: Data is lost on process restart.

mod follows;
mod posts;
mod users;

pub use follows::InMemoryFollowRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;
