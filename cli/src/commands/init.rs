use log::info;
use skillenhub::error::HubError;

use crate::get_runtime;

/// Building the runtime creates any missing table and loads the seed row.
pub fn execute() -> Result<(), HubError> {
    let runtime = get_runtime();
    info!("Initialised database {}", runtime.config.database.path);

    println!("Database {} is ready", runtime.config.database.path);
    for table in skillenhub::table_names() {
        println!("  {table}");
    }
    if !runtime.config.database.seed_demo_user {
        println!("Seed user not loaded, 'seed_demo_user' is disabled in the configuration");
    }
    Ok(())
}
