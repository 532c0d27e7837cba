//! Stateless password reset tokens.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use microblog_core::ports::{AuthError, ResetTokenService};

use super::jwt::JwtConfig;

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    reset_password: String, // user_id
    exp: i64,
    iat: i64,
    iss: String,
}

/// Signs `{reset_password: <user id>}` with the server secret.
///
/// Nothing is stored: a token is valid exactly when its signature, issuer and
/// expiry check out. Session tokens are not accepted here because they lack
/// the `reset_password` claim.
pub struct JwtResetTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expires_in: TimeDelta,
}

impl JwtResetTokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            expires_in: TimeDelta::seconds(config.reset_expiration_secs),
        }
    }
}

impl ResetTokenService for JwtResetTokenService {
    fn issue_reset_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = ResetClaims {
            reset_password: user_id.to_string(),
            exp: (now + self.expires_in).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn verify_reset_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<ResetClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Uuid::parse_str(&data.claims.reset_password)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtTokenService;
    use microblog_core::ports::TokenService;

    fn config(secret: &str, reset_expiration_secs: i64) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            reset_expiration_secs,
            ..JwtConfig::default()
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let service = JwtResetTokenService::new(&config("secret", 600));
        let user_id = Uuid::new_v4();

        let token = service.issue_reset_token(user_id).unwrap();

        assert_eq!(service.verify_reset_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtResetTokenService::new(&config("secret", -120));

        let token = service.issue_reset_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            service.verify_reset_token(&token).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let issuer = JwtResetTokenService::new(&config("one-secret", 600));
        let verifier = JwtResetTokenService::new(&config("another-secret", 600));

        let token = issuer.issue_reset_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            verifier.verify_reset_token(&token).unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }

    #[test]
    fn test_session_token_is_not_a_reset_token() {
        let cfg = config("secret", 600);
        let sessions = JwtTokenService::new(cfg.clone());
        let resets = JwtResetTokenService::new(&cfg);

        let session = sessions
            .generate_token(Uuid::new_v4(), "susan", false)
            .unwrap();

        assert!(resets.verify_reset_token(&session).is_err());
    }
}
