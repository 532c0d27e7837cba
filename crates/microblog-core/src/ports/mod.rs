//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod notify;
mod repository;

pub use auth::{AuthError, PasswordService, ResetTokenService, TokenClaims, TokenService};
pub use notify::{NotifyError, ResetNotifier};
pub use repository::{BaseRepository, FollowRepository, PostRepository, UserRepository};
