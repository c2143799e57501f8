use chrono::Local;
use log::debug;
use skillenhub::error::HubError;

use crate::{cli::PasswordReset, get_runtime};

/// Issues a one-time password and prints the e-mail that would have been sent.
pub fn execute(reset: &PasswordReset) -> Result<(), HubError> {
    let runtime = get_runtime();
    let issued = runtime.password_reset_service.request_reset(&reset.email)?;
    debug!("Issued reset {} for {}", issued.id, issued.email);

    println!("To: {}", issued.email);
    println!("Subject: SkillenHub password reset");
    println!();
    println!("Your one-time password is {}", issued.otp_code);
    println!(
        "It expires at {}",
        issued.expires_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    Ok(())
}
