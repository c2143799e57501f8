use crate::error::HubError;
use crate::repository::sqlite;
use crate::repository::sqlite::sqlite_application_repo::SqliteApplicationRepository;
use crate::repository::sqlite::sqlite_comment_repo::SqliteCommentRepository;
use crate::repository::sqlite::sqlite_connection_repo::SqliteConnectionRepository;
use crate::repository::sqlite::sqlite_event_repo::SqliteEventRepository;
use crate::repository::sqlite::sqlite_like_repo::SqliteLikeRepository;
use crate::repository::sqlite::sqlite_message_repo::SqliteMessageRepository;
use crate::repository::sqlite::sqlite_notification_repo::SqliteNotificationRepository;
use crate::repository::sqlite::sqlite_opportunity_repo::SqliteOpportunityRepository;
use crate::repository::sqlite::sqlite_password_reset_repo::SqlitePasswordResetRepository;
use crate::repository::sqlite::sqlite_post_repo::SqlitePostRepository;
use crate::repository::sqlite::sqlite_registration_repo::SqliteRegistrationRepository;
use crate::repository::sqlite::sqlite_user_repo::SqliteUserRepository;
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Represents parameters for initializing the database connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// SQLite database with a specific file path
    SqliteOnDisk { path: PathBuf },

    /// SQLite database that runs entirely in memory
    SqliteInMemory,
}

pub struct DatabaseManager {
    connection: SharedSqliteConnection,
}

impl DatabaseManager {
    /// Creates a new `DatabaseManager` based on the provided configuration,
    /// creating the schema and loading the seed user.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema cannot be created.
    pub fn new(config: &DatabaseConfig) -> Result<Self, HubError> {
        Self::with_seed(config, true)
    }

    /// Like [`DatabaseManager::new`], but the seed user is only loaded if `load_seed` is set.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema cannot be created.
    pub fn with_seed(config: &DatabaseConfig, load_seed: bool) -> Result<Self, HubError> {
        let connection = match config {
            DatabaseConfig::SqliteOnDisk { path } => {
                debug!("Opening database {}", path.display());
                sqlite::create_connection(path)?
            }
            DatabaseConfig::SqliteInMemory => Connection::open_in_memory()?,
        };
        let connection = Arc::new(Mutex::new(connection));

        sqlite::create_schema(&connection)?;
        if load_seed {
            let outcome = sqlite::load_seed_data(&connection)?;
            debug!("Seed data: {outcome:?}");
        }

        Ok(Self { connection })
    }

    /// Provide access to the shared database connection.
    pub(crate) fn get_connection(&self) -> SharedSqliteConnection {
        self.connection.clone()
    }

    pub(crate) fn create_user_repository(&self) -> Arc<SqliteUserRepository> {
        Arc::new(SqliteUserRepository::new(self.get_connection()))
    }

    pub(crate) fn create_post_repository(&self) -> Arc<SqlitePostRepository> {
        Arc::new(SqlitePostRepository::new(self.get_connection()))
    }

    pub(crate) fn create_comment_repository(&self) -> Arc<SqliteCommentRepository> {
        Arc::new(SqliteCommentRepository::new(self.get_connection()))
    }

    pub(crate) fn create_like_repository(&self) -> Arc<SqliteLikeRepository> {
        Arc::new(SqliteLikeRepository::new(self.get_connection()))
    }

    pub(crate) fn create_connection_repository(&self) -> Arc<SqliteConnectionRepository> {
        Arc::new(SqliteConnectionRepository::new(self.get_connection()))
    }

    pub(crate) fn create_message_repository(&self) -> Arc<SqliteMessageRepository> {
        Arc::new(SqliteMessageRepository::new(self.get_connection()))
    }

    pub(crate) fn create_notification_repository(&self) -> Arc<SqliteNotificationRepository> {
        Arc::new(SqliteNotificationRepository::new(self.get_connection()))
    }

    pub(crate) fn create_opportunity_repository(&self) -> Arc<SqliteOpportunityRepository> {
        Arc::new(SqliteOpportunityRepository::new(self.get_connection()))
    }

    pub(crate) fn create_application_repository(&self) -> Arc<SqliteApplicationRepository> {
        Arc::new(SqliteApplicationRepository::new(self.get_connection()))
    }

    pub(crate) fn create_event_repository(&self) -> Arc<SqliteEventRepository> {
        Arc::new(SqliteEventRepository::new(self.get_connection()))
    }

    pub(crate) fn create_registration_repository(&self) -> Arc<SqliteRegistrationRepository> {
        Arc::new(SqliteRegistrationRepository::new(self.get_connection()))
    }

    pub(crate) fn create_password_reset_repository(&self) -> Arc<SqlitePasswordResetRepository> {
        Arc::new(SqlitePasswordResetRepository::new(self.get_connection()))
    }
}
