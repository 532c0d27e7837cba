//! Authentication ports: password hashing, session tokens and reset tokens.

use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub exp: i64,
}

/// Session token service.
pub trait TokenService: Send + Sync {
    /// Generate a session token for a user. `remember` selects the long-lived expiry.
    fn generate_token(
        &self,
        user_id: Uuid,
        username: &str,
        remember: bool,
    ) -> Result<String, AuthError>;

    /// Validate and decode a session token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of a freshly generated token, in seconds.
    fn expiration_seconds(&self, remember: bool) -> i64;
}

/// Stateless, signed, time-limited password reset tokens.
pub trait ResetTokenService: Send + Sync {
    fn issue_reset_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Returns the user the token was issued for, if signature and expiry check out.
    fn verify_reset_token(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
