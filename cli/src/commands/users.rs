use skillenhub::error::HubError;

use crate::{cli::Users, get_runtime};

pub fn execute(users: &Users) -> Result<(), HubError> {
    let runtime = get_runtime();
    let found = runtime.user_service.list_users(users.limit)?;
    if found.is_empty() {
        eprintln!("No users registered. Use 'skillenhub init' to load the seed user");
        return Ok(());
    }

    println!(
        "{:>6} {:<30} {:<40} {:<8} {:<16}",
        "Id", "Name", "E-mail", "Role", "Created"
    );
    println!("{}", "-".repeat(104));
    for user in found {
        let role = if user.role.as_str().is_empty() {
            "-"
        } else {
            user.role.as_str()
        };
        println!(
            "{:>6} {:<30} {:<40} {:<8} {:<16}",
            user.id.value(),
            user.full_name,
            user.email,
            role,
            user.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
