use std::process::exit;

use skillenhub::config;

use crate::cli::{ConfigCommand, UpdateConfiguration};

fn list_and_exit() {
    println!(
        "Configuration file {}:\n",
        config::configuration_file().to_string_lossy()
    );

    match config::load() {
        Ok(config) => match config::application_config_to_string(&config) {
            Ok(toml_as_string) => println!("{toml_as_string}"),
            Err(e) => {
                eprintln!("ERROR: Unable to format the configuration: {e}");
                exit(4);
            }
        },
        Err(_) => {
            println!("Config file does not exist or is empty. Use 'config update --database' to create it");
        }
    }
    exit(0);
}

fn update(settings: UpdateConfiguration) {
    let mut app_config = match config::load_or_default() {
        Ok(ac) => ac,
        Err(e) => {
            eprintln!(
                "ERROR: Unable to load configuration file {}, reason:{}",
                config::configuration_file().to_string_lossy(),
                e
            );
            exit(4);
        }
    };

    app_config.database.path = settings.database;
    if let Some(seed) = settings.seed_demo_user {
        app_config.database.seed_demo_user = seed;
    }
    if let Some(minutes) = settings.otp_expiry_minutes {
        app_config.password_reset.expiry_minutes = minutes;
    }

    if let Err(e) = app_config.password_reset.validate() {
        eprintln!("ERROR: {e}");
        exit(3);
    }

    if let Err(e) = config::save(&app_config) {
        eprintln!(
            "ERROR: Unable to save configuration file {}, reason:{}",
            config::configuration_file().to_string_lossy(),
            e
        );
        exit(4);
    }
    println!(
        "Configuration saved to {}",
        config::configuration_file().to_string_lossy()
    );
}

pub fn execute(cmd: ConfigCommand) {
    match cmd {
        ConfigCommand::List => list_and_exit(),
        ConfigCommand::Update(settings) => update(settings),
        ConfigCommand::Remove => match config::remove() {
            Ok(()) => {
                println!(
                    "Configuration file {} removed",
                    config::configuration_file().to_string_lossy()
                );
            }
            Err(e) => {
                println!(
                    "ERROR:Unable to remove configuration file {} : {}",
                    config::configuration_file().to_string_lossy(),
                    e
                );
            }
        },
    }
}
