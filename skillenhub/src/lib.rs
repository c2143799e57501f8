//! Storage layer of SkillenHub, a social network and job board for students.
//!
//! Twelve tables live in a single SQLite database: users and their posts,
//! comments and likes, connections and direct messages, notifications, job and
//! internship opportunities with their applications, events with their
//! registrations, and one-time password reset codes. Each table has a
//! repository trait in [`repository`] backed by an SQLite implementation; the
//! services in [`service`] add the rules the schema leaves to the application.
//!
//! ```rust,ignore
//! let runtime = HubRuntimeBuilder::new().use_in_memory_db().build()?;
//! let ada = runtime
//!     .user_service
//!     .register(&NewUser::new("Ada", "ada@x.com", "$2y$10$..."))?;
//! runtime.feed_service.create_post(&NewPost::new(ada, "Hello, SkillenHub"))?;
//! ```
use crate::config::AppConfiguration;
use crate::error::HubError;
use crate::repository::database_manager::{DatabaseConfig, DatabaseManager};
use crate::service::connection_service::ConnectionService;
use crate::service::event_service::EventService;
use crate::service::feed_service::FeedService;
use crate::service::message_service::MessageService;
use crate::service::notification_service::NotificationService;
use crate::service::opportunity_service::OpportunityService;
use crate::service::password_reset_service::PasswordResetService;
use crate::service::stats_service::StatsService;
use crate::service::user_service::UserService;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use repository::sqlite::{schema_sql, table_names};

/// Holds the services of the application, all sharing one database connection.
pub struct HubRuntime {
    pub config: AppConfiguration,
    pub user_service: Arc<UserService>,
    pub feed_service: Arc<FeedService>,
    pub connection_service: Arc<ConnectionService>,
    pub message_service: Arc<MessageService>,
    pub notification_service: Arc<NotificationService>,
    pub opportunity_service: Arc<OpportunityService>,
    pub event_service: Arc<EventService>,
    pub password_reset_service: Arc<PasswordResetService>,
    pub stats_service: Arc<StatsService>,
}

impl HubRuntime {
    /// Creates the runtime from the configuration file, or from the defaults if there is none.
    ///
    /// # Errors
    ///
    /// - Returns an error if the configuration file exists but cannot be parsed.
    /// - Returns an error if the database cannot be opened or initialised.
    pub fn new() -> Result<Self, HubError> {
        HubRuntimeBuilder::new()
            .with_configuration(config::load_or_default()?)
            .build()
    }
}

#[derive(Default)]
pub struct HubRuntimeBuilder {
    config: Option<AppConfiguration>,
    database: Option<DatabaseConfig>,
}

impl HubRuntimeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_configuration(mut self, config: AppConfiguration) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the database path of the configuration.
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(DatabaseConfig::SqliteOnDisk { path: path.into() });
        self
    }

    #[must_use]
    pub fn use_in_memory_db(mut self) -> Self {
        self.database = Some(DatabaseConfig::SqliteInMemory);
        self
    }

    /// Opens the database, creates the schema and wires up the services.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialised.
    pub fn build(self) -> Result<HubRuntime, HubError> {
        let config = self.config.unwrap_or_default();
        let database = self.database.unwrap_or_else(|| DatabaseConfig::SqliteOnDisk {
            path: PathBuf::from(&config.database.path),
        });
        debug!("Building runtime with {database:?}");

        let db_manager = DatabaseManager::with_seed(&database, config.database.seed_demo_user)?;

        let users = db_manager.create_user_repository();
        let posts = db_manager.create_post_repository();
        let connections = db_manager.create_connection_repository();
        let messages = db_manager.create_message_repository();
        let notifications = db_manager.create_notification_repository();
        let opportunities = db_manager.create_opportunity_repository();
        let applications = db_manager.create_application_repository();
        let events = db_manager.create_event_repository();
        let registrations = db_manager.create_registration_repository();

        let notification_service = Arc::new(NotificationService::new(notifications.clone()));
        let connection_service = Arc::new(ConnectionService::new(
            connections.clone(),
            users.clone(),
            notification_service.clone(),
        ));

        Ok(HubRuntime {
            user_service: Arc::new(UserService::new(users.clone())),
            feed_service: Arc::new(FeedService::new(
                posts.clone(),
                db_manager.create_comment_repository(),
                db_manager.create_like_repository(),
                users.clone(),
            )),
            message_service: Arc::new(MessageService::new(
                messages.clone(),
                users.clone(),
                connection_service.clone(),
                notification_service.clone(),
            )),
            opportunity_service: Arc::new(OpportunityService::new(
                opportunities.clone(),
                applications.clone(),
                users.clone(),
                notification_service.clone(),
            )),
            event_service: Arc::new(EventService::new(
                events.clone(),
                registrations.clone(),
                users.clone(),
            )),
            password_reset_service: Arc::new(PasswordResetService::new(
                db_manager.create_password_reset_repository(),
                users.clone(),
                config.password_reset.clone(),
            )?),
            stats_service: Arc::new(StatsService {
                users,
                opportunities,
                applications,
                events,
                registrations,
                posts,
                connections,
                messages,
                notifications,
            }),
            connection_service,
            notification_service,
            config,
        })
    }
}
