pub mod connection_service;
pub mod event_service;
pub mod feed_service;
pub mod message_service;
pub mod notification_service;
pub mod opportunity_service;
pub mod password_reset_service;
pub mod stats_service;
pub mod user_service;

use crate::error::HubError;

/// Rejects blank text, naming `what` in the error.
pub(crate) fn require_text(value: &str, what: &str) -> Result<(), HubError> {
    if value.trim().is_empty() {
        return Err(HubError::BadInput(format!("{what} must not be empty")));
    }
    Ok(())
}

/// E-mail addresses are stored trimmed and lower-cased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
