use std::{io, path::PathBuf};

use rusqlite::ffi;
use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum HubError {
    #[error("Unable to load the application configuration file {path:?}")]
    ApplicationConfig { path: PathBuf, source: io::Error },
    #[error("Unable to parse contents of {path}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Unable to create configuration file {path}")]
    ConfigFileCreation { path: PathBuf },
    #[error("Unable to open DBMS in file {path}: {reason}")]
    OpenDbms { path: String, reason: String },
    #[error("SQL dbms error: {0}")]
    Sql(String),
    #[error("Directory creation failed")]
    CreateDir(#[from] io::Error),
    #[error("Mutex locking error")]
    LockPoisoned,
    #[error("Unique constraint violated on {table}: {detail}")]
    UniqueConstraintViolation { table: String, detail: String },
    #[error("Value rejected by the database: {0}")]
    CheckViolation(String),
    #[error("No {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Referenced {entity} with id {id} does not exist")]
    ReferenceNotFound { entity: &'static str, id: String },
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnumValue { field: &'static str, value: String },
    #[error("Could not make sense of input: {0}")]
    BadInput(String),
    #[error("A pending or accepted connection already exists between users {0} and {1}")]
    ConnectionExists(i64, i64),
    #[error("Users {0} and {1} are not connected")]
    NotConnected(i64, i64),
    #[error("Connection {id} cannot be changed: {reason}")]
    InvalidConnectionState { id: i64, reason: String },
    #[error("Event {0} has reached its maximum number of participants")]
    EventFull(i64),
    #[error("Registration for event {0} is closed")]
    RegistrationClosed(i64),
    #[error("Invalid OTP code for {0}")]
    OtpInvalid(String),
    #[error("The OTP code for {0} has expired")]
    OtpExpired(String),
}

impl HubError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        HubError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn reference_not_found(entity: &'static str, id: impl ToString) -> Self {
        HubError::ReferenceNotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classifies a failed write on `table`, turning constraint failures into
    /// their dedicated variants.
    pub(crate) fn from_write(table: &str, err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(error, message) = &err {
            let detail = message.clone().unwrap_or_else(|| error.to_string());
            match error.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return HubError::UniqueConstraintViolation {
                        table: table.to_string(),
                        detail,
                    };
                }
                ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL => {
                    return HubError::CheckViolation(detail);
                }
                _ => {}
            }
        }
        HubError::Sql(format!("Unable to write to {table}: {err}"))
    }
}

impl From<rusqlite::Error> for HubError {
    fn from(err: rusqlite::Error) -> Self {
        HubError::Sql(format!("Sqlite error {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_failure_is_classified() {
        let err = rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_CONSTRAINT_UNIQUE),
            Some("UNIQUE constraint failed: users.email".to_string()),
        );
        match HubError::from_write("users", err) {
            HubError::UniqueConstraintViolation { table, detail } => {
                assert_eq!(table, "users");
                assert!(detail.contains("users.email"));
            }
            other => panic!("Expected a unique constraint violation, got {other:?}"),
        }
    }

    #[test]
    fn other_failures_become_sql_errors() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(HubError::from_write("posts", err), HubError::Sql(_)));
    }
}
