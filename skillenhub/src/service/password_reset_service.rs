//! One-time password flow for forgotten passwords.
//!
//! A request replaces any earlier code for the address with a fresh numeric
//! code. Storage never looks at `expires_at`; the code is judged here, against
//! the clock of the caller.
use crate::config::PasswordResetSettings;
use crate::error::HubError;
use crate::models::password_reset::{NewPasswordReset, PasswordReset};
use crate::repository::password_reset_repository::PasswordResetRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::normalize_email;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use rand::Rng;
use std::sync::Arc;

pub struct PasswordResetService {
    resets: Arc<dyn PasswordResetRepository>,
    users: Arc<dyn UserRepository>,
    settings: PasswordResetSettings,
}

impl PasswordResetService {
    /// # Errors
    /// Returns `HubError::BadInput` if the code length or lifetime is out of range.
    pub fn new(
        resets: Arc<dyn PasswordResetRepository>,
        users: Arc<dyn UserRepository>,
        settings: PasswordResetSettings,
    ) -> Result<Self, HubError> {
        settings.validate()?;
        Ok(Self {
            resets,
            users,
            settings,
        })
    }

    ///
    /// Issues a new code for the account registered with `email`.
    ///
    /// The code would be e-mailed to the user; here the message is only logged.
    ///
    /// # Errors
    /// * `HubError::NotFound` if no account uses this e-mail address.
    pub fn request_reset(&self, email: &str) -> Result<PasswordReset, HubError> {
        self.request_reset_at(email, Utc::now())
    }

    pub fn request_reset_at(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<PasswordReset, HubError> {
        let email = normalize_email(email);
        if self.users.find_user_by_email(&email)?.is_none() {
            return Err(HubError::not_found("user", &email));
        }

        let replaced = self.resets.delete_by_email(&email)?;
        if replaced > 0 {
            debug!("Replacing {replaced} earlier codes for {email}");
        }

        let expires_at = Duration::try_minutes(self.settings.expiry_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                HubError::BadInput(format!(
                    "A code issued at {now} cannot expire {} minutes later",
                    self.settings.expiry_minutes
                ))
            })?;
        let id = self.resets.create_password_reset(&NewPasswordReset {
            email: email.clone(),
            otp_code: generate_otp(self.settings.otp_length),
            expires_at,
        })?;
        let reset = self.resets.find_password_reset_by_id(id)?;
        info!(
            "Password reset code sent to {email}, valid for {} minutes",
            self.settings.expiry_minutes
        );
        Ok(reset)
    }

    /// Checks the code against the current time.
    pub fn verify(&self, email: &str, otp_code: &str) -> Result<PasswordReset, HubError> {
        self.verify_at(email, otp_code, Utc::now())
    }

    ///
    /// Checks that `otp_code` is the code issued for `email` and still valid at `now`.
    ///
    /// # Errors
    /// * `HubError::OtpInvalid` if there is no such code for the address.
    /// * `HubError::OtpExpired` if the code expired at or before `now`.
    pub fn verify_at(
        &self,
        email: &str,
        otp_code: &str,
        now: DateTime<Utc>,
    ) -> Result<PasswordReset, HubError> {
        let email = normalize_email(email);
        let reset = self
            .resets
            .find_by_email_and_code(&email, otp_code.trim())?
            .ok_or_else(|| HubError::OtpInvalid(email.clone()))?;
        if reset.is_expired(now) {
            return Err(HubError::OtpExpired(email));
        }
        Ok(reset)
    }

    /// Verifies the code, stores the new password hash and discards the code.
    pub fn complete_reset(
        &self,
        email: &str,
        otp_code: &str,
        new_password_hash: &str,
    ) -> Result<(), HubError> {
        self.complete_reset_at(email, otp_code, new_password_hash, Utc::now())
    }

    pub fn complete_reset_at(
        &self,
        email: &str,
        otp_code: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<(), HubError> {
        let reset = self.verify_at(email, otp_code, now)?;
        self.users
            .update_password_by_email(&reset.email, new_password_hash)?;
        self.resets.delete_by_email(&reset.email)?;
        info!("Password of {} has been reset", reset.email);
        Ok(())
    }
}

/// A numeric code of `length` random digits; leading zeros are kept.
fn generate_otp(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length.max(1))
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_has_requested_number_of_digits() {
        for length in [4, 6, 8] {
            let otp = generate_otp(length);
            assert_eq!(otp.len(), length);
            assert!(otp.chars().all(|c| c.is_ascii_digit()), "{otp}");
        }
    }

    #[test]
    fn zero_length_still_yields_a_digit() {
        assert_eq!(generate_otp(0).len(), 1);
    }
}
