use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::core::PasswordResetId;

/// A row of the `password_resets` table.
///
/// Storage never enforces `expires_at`; callers decide with [`PasswordReset::is_expired`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    pub id: PasswordResetId,
    pub email: String,
    pub otp_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PasswordReset {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPasswordReset {
    pub email: String,
    pub otp_code: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetUpdate {
    pub otp_code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
