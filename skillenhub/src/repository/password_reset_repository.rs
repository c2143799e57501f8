use crate::error::HubError;
use crate::models::core::PasswordResetId;
use crate::models::password_reset::{NewPasswordReset, PasswordReset, PasswordResetUpdate};

/// Storage of one-time password reset codes.
///
/// Rows are returned whether or not they have expired, expiry is the caller's concern.
pub trait PasswordResetRepository: Send + Sync {
    fn create_password_reset(&self, reset: &NewPasswordReset)
        -> Result<PasswordResetId, HubError>;

    fn find_password_reset_by_id(&self, id: PasswordResetId)
        -> Result<PasswordReset, HubError>;

    /// The most recent reset issued for `email`.
    fn find_by_email(&self, email: &str) -> Result<Option<PasswordReset>, HubError>;

    fn find_by_email_and_code(
        &self,
        email: &str,
        otp_code: &str,
    ) -> Result<Option<PasswordReset>, HubError>;

    fn update_password_reset(
        &self,
        id: PasswordResetId,
        update: &PasswordResetUpdate,
    ) -> Result<(), HubError>;

    fn delete_password_reset(&self, id: PasswordResetId) -> Result<(), HubError>;

    /// Returns the number of deleted rows.
    fn delete_by_email(&self, email: &str) -> Result<usize, HubError>;
}
