//! Reset notifier that writes the reset link to the structured log.
//!
//! Stands in for an e-mail transport in development deployments.

use async_trait::async_trait;

use microblog_core::domain::User;
use microblog_core::ports::{NotifyError, ResetNotifier};

pub struct LogResetNotifier {
    base_url: String,
}

impl LogResetNotifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/api/auth/reset-password/{}",
            self.base_url.trim_end_matches('/'),
            token
        )
    }
}

#[async_trait]
impl ResetNotifier for LogResetNotifier {
    async fn send_reset(&self, user: &User, token: &str) -> Result<(), NotifyError> {
        tracing::info!(
            user_id = %user.id,
            reset_link = %self.reset_link(token),
            "Password reset link"
        );
        Ok(())
    }
}
