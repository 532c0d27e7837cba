//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Response containing a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request a password reset link for an email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// New password submitted together with a reset token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordForm {
    pub password: String,
}

/// Profile edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditProfileRequest {
    pub username: String,
    #[serde(default)]
    pub about_me: Option<String>,
}

/// New post submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
}

/// `?page=` query parameter, kept raw so that junk input falls back to
/// page 1 instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// The requested page number, or `None` if missing or not an integer.
    pub fn number(&self) -> Option<i64> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }
}

/// A user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub about_me: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub followers: u64,
    pub following: u64,
    /// Whether the requesting user follows this profile; absent on one's own profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

/// A post as shown in feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    /// Author's username; `None` if the author no longer exists.
    pub author: Option<String>,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

/// One page of posts with navigation links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPageResponse {
    pub items: Vec<PostResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_url: Option<String>,
    pub prev_url: Option<String>,
}

/// Profile page: the profile plus that user's posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPageResponse {
    pub user: ProfileResponse,
    pub posts: PostPageResponse,
}
