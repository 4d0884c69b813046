//! Out-of-band delivery of password reset codes.

use tracing::info;

use streams_types::models::UserId;

use crate::error::Result;

/// Hands a freshly issued reset code to whoever reaches the user (a mailer,
/// a queue). Called while the store lock is held, before the code is
/// recorded, so implementations must not block on slow I/O.
pub trait ResetCodeSink: Send + Sync {
    fn deliver(&self, user_id: UserId, email: &str, code: &str) -> Result<()>;
}

/// Default sink: writes the code to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl ResetCodeSink for LogSink {
    fn deliver(&self, user_id: UserId, email: &str, code: &str) -> Result<()> {
        info!("Password reset code for user {} <{}>: {}", user_id, email, code);
        Ok(())
    }
}
