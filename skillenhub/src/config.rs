use crate::error::HubError;
use anyhow::Result;
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Application configuration struct
/// Holds the location of the database and the tuning of the password reset flow
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct AppConfiguration {
    /// Ensures the database section is created, even if the Toml file lacks it
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub password_reset: PasswordResetSettings,
}

/// Holds the configuration for the `database` section of the Toml file
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct DatabaseSettings {
    /// The path to the Sqlite database file
    #[serde(default = "default_database_path")]
    pub path: String,
    /// Whether the demo user row is loaded when the schema is created
    #[serde(default = "default_seed_demo_user")]
    pub seed_demo_user: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            seed_demo_user: default_seed_demo_user(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PasswordResetSettings {
    /// Number of digits in a one-time password
    #[serde(default = "default_otp_length")]
    pub otp_length: usize,
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,
}

/// Accepted number of digits in a one-time password
pub const OTP_LENGTH_RANGE: RangeInclusive<usize> = 4..=10;
/// Accepted lifetime of a one-time password, one minute up to a week
pub const EXPIRY_MINUTES_RANGE: RangeInclusive<i64> = 1..=7 * 24 * 60;

impl PasswordResetSettings {
    /// Rejects code lengths and lifetimes outside [`OTP_LENGTH_RANGE`] and
    /// [`EXPIRY_MINUTES_RANGE`].
    ///
    /// # Errors
    /// Returns `HubError::BadInput` naming the offending setting.
    pub fn validate(&self) -> Result<(), HubError> {
        if !OTP_LENGTH_RANGE.contains(&self.otp_length) {
            return Err(HubError::BadInput(format!(
                "password_reset.otp_length must be between {} and {}, not {}",
                OTP_LENGTH_RANGE.start(),
                OTP_LENGTH_RANGE.end(),
                self.otp_length
            )));
        }
        if !EXPIRY_MINUTES_RANGE.contains(&self.expiry_minutes) {
            return Err(HubError::BadInput(format!(
                "password_reset.expiry_minutes must be between {} and {}, not {}",
                EXPIRY_MINUTES_RANGE.start(),
                EXPIRY_MINUTES_RANGE.end(),
                self.expiry_minutes
            )));
        }
        Ok(())
    }
}

impl Default for PasswordResetSettings {
    fn default() -> Self {
        PasswordResetSettings {
            otp_length: default_otp_length(),
            expiry_minutes: default_expiry_minutes(),
        }
    }
}

/// Filename holding the application configuration parameters
#[must_use]
pub fn configuration_file() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("skillenhub.toml"),
        |dirs| dirs.preference_dir().join("config.toml"),
    )
}

/// Filename of the Sqlite DBMS holding the SkillenHub tables
#[must_use]
pub fn database_file() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("skillenhub.db"),
        |dirs| dirs.data_dir().join("skillenhub.db"),
    )
}

#[allow(clippy::missing_errors_doc)]
pub fn load() -> Result<AppConfiguration, HubError> {
    read(&configuration_file())
}

/// Loads the configuration file, falling back to the defaults if there is none.
#[allow(clippy::missing_errors_doc)]
pub fn load_or_default() -> Result<AppConfiguration, HubError> {
    let path = configuration_file();
    if path.exists() {
        read(&path)
    } else {
        debug!("No configuration in {}, using defaults", path.display());
        Ok(AppConfiguration::default())
    }
}

#[allow(clippy::missing_errors_doc)]
pub fn save(cfg: &AppConfiguration) -> Result<()> {
    create_configuration_file(cfg, &configuration_file())
}

#[allow(clippy::missing_errors_doc)]
pub fn remove() -> io::Result<()> {
    fs::remove_file(configuration_file().as_path())
}

#[allow(clippy::missing_errors_doc)]
pub fn application_config_to_string(cfg: &AppConfiguration) -> Result<String> {
    Ok(toml::to_string::<AppConfiguration>(cfg)?)
}

fn default_database_path() -> String {
    database_file().to_string_lossy().to_string()
}

fn default_seed_demo_user() -> bool {
    true
}

fn default_otp_length() -> usize {
    6
}

fn default_expiry_minutes() -> i64 {
    10
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "skillenhub", "skillenhub")
}

/// Reads the `Application` configuration struct from the supplied TOML file
fn read(path: &Path) -> Result<AppConfiguration, HubError> {
    let mut file = File::open(path).map_err(|source| HubError::ApplicationConfig {
        path: path.into(),
        source,
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| HubError::ApplicationConfig {
            path: path.into(),
            source,
        })?;
    toml::from_str::<AppConfiguration>(&contents).map_err(|source| HubError::TomlParse {
        path: path.into(),
        source,
    })
}

fn create_configuration_file(cfg: &AppConfiguration, path: &Path) -> Result<()> {
    if let Some(directory) = path.parent() {
        if !directory.as_os_str().is_empty() && !directory.try_exists()? {
            fs::create_dir_all(directory)?;
        }
    }

    let mut file = File::create(path).map_err(|_| HubError::ConfigFileCreation {
        path: path.to_path_buf(),
    })?;
    let toml = application_config_to_string(cfg)?;
    file.write_all(toml.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_parsing() {
        let toml_str = r#"
        [database]
        path = "hub.db"
        seed_demo_user = false

        [password_reset]
        otp_length = 8
        expiry_minutes = 15
        "#;

        let app_config: AppConfiguration = toml::from_str(toml_str).unwrap();
        assert_eq!(app_config.database.path, "hub.db");
        assert!(!app_config.database.seed_demo_user);
        assert_eq!(app_config.password_reset.otp_length, 8);
        assert_eq!(app_config.password_reset.expiry_minutes, 15);
    }

    /// Missing sections and keys are populated with reasonable defaults
    #[test]
    fn test_toml_parsing_with_defaults_generated() {
        let toml_str = r#"
        [database]
        path = "hub.db"
        "#;

        let app_config: AppConfiguration = toml::from_str(toml_str).unwrap();
        assert!(app_config.database.seed_demo_user);
        assert_eq!(app_config.password_reset, PasswordResetSettings::default());
        assert_eq!(app_config.password_reset.otp_length, 6);
        assert_eq!(app_config.password_reset.expiry_minutes, 10);

        let empty: AppConfiguration = toml::from_str("").unwrap();
        assert_eq!(empty.database.path, database_file().to_string_lossy());
    }

    #[test]
    fn test_write_and_read_toml_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let tmp_config_file = dir.path().join("nested").join("config.toml");

        let cfg = AppConfiguration {
            database: DatabaseSettings {
                path: "/tmp/hub.db".to_string(),
                seed_demo_user: false,
            },
            password_reset: PasswordResetSettings::default(),
        };

        create_configuration_file(&cfg, &tmp_config_file)?;
        let result = read(&tmp_config_file)?;
        assert_eq!(cfg, result);
        Ok(())
    }

    #[test]
    fn password_reset_settings_are_bounded() {
        assert!(PasswordResetSettings::default().validate().is_ok());

        for expiry_minutes in [i64::MIN, -5, 0, 7 * 24 * 60 + 1, i64::MAX] {
            let settings = PasswordResetSettings {
                expiry_minutes,
                ..Default::default()
            };
            assert!(
                matches!(settings.validate(), Err(HubError::BadInput(_))),
                "{expiry_minutes} accepted"
            );
        }
        for otp_length in [0, 3, 11, 50] {
            let settings = PasswordResetSettings {
                otp_length,
                ..Default::default()
            };
            assert!(
                matches!(settings.validate(), Err(HubError::BadInput(_))),
                "{otp_length} accepted"
            );
        }

        let widest = PasswordResetSettings {
            otp_length: 10,
            expiry_minutes: 7 * 24 * 60,
        };
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn reading_garbage_reports_parse_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "[database\npath = ")?;
        assert!(matches!(read(&path), Err(HubError::TomlParse { .. })));
        assert!(matches!(
            read(&dir.path().join("missing.toml")),
            Err(HubError::ApplicationConfig { .. })
        ));
        Ok(())
    }
}
