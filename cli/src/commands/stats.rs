use skillenhub::error::HubError;

use crate::get_runtime;

pub fn execute() -> Result<(), HubError> {
    let stats = get_runtime().stats_service.platform_stats()?;

    println!("{:<24} {:>8}", "Users", stats.users);
    println!("{:<24} {:>8}", "Posts", stats.posts);
    println!("{:<24} {:>8}", "Accepted connections", stats.connections);
    println!("{:<24} {:>8}", "Opportunities", stats.opportunities);
    println!("{:<24} {:>8}", "Applications", stats.applications);
    println!("{:<24} {:>8}", "Events", stats.events);
    println!("{:<24} {:>8}", "Event registrations", stats.registrations);
    Ok(())
}
