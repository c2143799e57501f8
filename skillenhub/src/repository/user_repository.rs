use crate::error::HubError;
use crate::models::core::UserId;
use crate::models::user::{NewUser, User, UserUpdate};

/// All CRUD operations related to the `User` entity.
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    ///
    /// Inserts a new user and returns the generated id.
    ///
    /// # Errors
    /// * `HubError::UniqueConstraintViolation` if the e-mail is already registered,
    ///   compared case-insensitively.
    fn create_user(&self, user: &NewUser) -> Result<UserId, HubError>;

    ///
    /// Retrieves a user by its id.
    ///
    /// # Errors
    /// * `HubError::NotFound` if no user has this id.
    fn find_user_by_id(&self, id: UserId) -> Result<User, HubError>;

    /// Looks up a user by e-mail, ignoring case.
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, HubError>;

    /// Lists users, newest first.
    fn list_users(&self, limit: Option<usize>) -> Result<Vec<User>, HubError>;

    ///
    /// Applies the non-empty fields of `update` to the user.
    ///
    /// # Errors
    /// * `HubError::NotFound` if no user has this id.
    /// * `HubError::UniqueConstraintViolation` if the new e-mail is taken.
    fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<(), HubError>;

    /// Replaces the password hash of the user registered with `email`.
    fn update_password_by_email(&self, email: &str, password_hash: &str) -> Result<(), HubError>;

    /// Deletes the user. Rows referring to it are left in place.
    fn delete_user(&self, id: UserId) -> Result<(), HubError>;

    fn user_exists(&self, id: UserId) -> Result<bool, HubError>;

    fn count_users(&self) -> Result<i64, HubError>;
}
