mod schema_tests;

use crate::error::HubError;
use crate::models::core::UserId;
use crate::models::user::NewUser;
use crate::repository::database_manager::{DatabaseConfig, DatabaseManager};
use crate::repository::user_repository::UserRepository;

/// Creates a `DatabaseManager` with an in-memory database suitable for testing.
pub fn test_database_manager() -> Result<DatabaseManager, HubError> {
    DatabaseManager::new(&DatabaseConfig::SqliteInMemory)
}

/// Inserts a student named after the e-mail address, e.g. `Test User a@x.com`.
pub fn create_test_user(db_manager: &DatabaseManager, email: &str) -> Result<UserId, HubError> {
    db_manager.create_user_repository().create_user(&NewUser::new(
        &format!("Test User {email}"),
        email,
        "$2y$10$hash",
    ))
}
