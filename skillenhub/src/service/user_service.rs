use crate::error::HubError;
use crate::models::core::UserId;
use crate::models::user::{NewUser, User, UserUpdate};
use crate::repository::user_repository::UserRepository;
use crate::service::{normalize_email, require_text};
use log::{debug, info};
use std::sync::Arc;

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Registers a new account.
    ///
    /// # Errors
    /// * `HubError::BadInput` if the name is blank or the e-mail address is malformed.
    /// * `HubError::UniqueConstraintViolation` if the e-mail address is already registered.
    pub fn register(&self, user: &NewUser) -> Result<UserId, HubError> {
        require_text(&user.full_name, "full name")?;
        let email = normalize_email(&user.email);
        if !email.contains('@') {
            return Err(HubError::BadInput(format!(
                "'{}' is not an e-mail address",
                user.email
            )));
        }
        if self.repo.find_user_by_email(&email)?.is_some() {
            return Err(HubError::UniqueConstraintViolation {
                table: "users".to_string(),
                detail: format!("{email} is already registered"),
            });
        }

        let normalized = NewUser {
            full_name: user.full_name.trim().to_string(),
            email,
            ..user.clone()
        };
        let id = self.repo.create_user(&normalized)?;
        info!("Registered {} as user {id}", normalized.email);
        Ok(id)
    }

    pub fn find_user(&self, id: UserId) -> Result<User, HubError> {
        self.repo.find_user_by_id(id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, HubError> {
        self.repo.find_user_by_email(&normalize_email(email))
    }

    pub fn list_users(&self, limit: Option<usize>) -> Result<Vec<User>, HubError> {
        self.repo.list_users(limit)
    }

    /// Updates the profile, normalizing a changed e-mail address.
    pub fn update_profile(&self, id: UserId, update: &UserUpdate) -> Result<(), HubError> {
        if let Some(name) = &update.full_name {
            require_text(name, "full name")?;
        }
        let mut update = update.clone();
        update.email = update.email.as_deref().map(normalize_email);
        debug!("Updating profile of user {id}");
        self.repo.update_user(id, &update)
    }

    pub fn delete_user(&self, id: UserId) -> Result<(), HubError> {
        self.repo.delete_user(id)
    }
}

/// Fails with `ReferenceNotFound` unless the user is stored.
pub(crate) fn ensure_user_exists(repo: &dyn UserRepository, id: UserId) -> Result<(), HubError> {
    if repo.user_exists(id)? {
        Ok(())
    } else {
        Err(HubError::reference_not_found(UserId::ENTITY, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::repository::user_repository::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn stored_user(id: i64, email: &str) -> User {
        User {
            id: UserId(id),
            full_name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Student,
            profile_pic: None,
            bio: None,
            education: None,
            skills: None,
            github_link: None,
            linkedin_link: None,
            resume_file: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn register_normalizes_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_email()
            .with(eq("ada@x.com"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create_user()
            .withf(|user| user.email == "ada@x.com" && user.full_name == "Ada")
            .times(1)
            .returning(|_| Ok(UserId(7)));

        let service = UserService::new(Arc::new(repo));
        let id = service
            .register(&NewUser::new(" Ada ", "  Ada@X.com ", "hash"))
            .unwrap();
        assert_eq!(id, UserId(7));
    }

    #[test]
    fn register_rejects_taken_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_email()
            .returning(|email| Ok(Some(stored_user(1, email))));
        repo.expect_create_user().never();

        let service = UserService::new(Arc::new(repo));
        let result = service.register(&NewUser::new("Ada", "ada@x.com", "hash"));
        assert!(matches!(
            result,
            Err(HubError::UniqueConstraintViolation { ref table, .. }) if table == "users"
        ));
    }

    #[test]
    fn register_rejects_malformed_input() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user().never();
        let service = UserService::new(Arc::new(repo));

        assert!(matches!(
            service.register(&NewUser::new("  ", "ada@x.com", "hash")),
            Err(HubError::BadInput(_))
        ));
        assert!(matches!(
            service.register(&NewUser::new("Ada", "not-an-address", "hash")),
            Err(HubError::BadInput(_))
        ));
    }

    #[test]
    fn missing_user_is_a_missing_reference() {
        let mut repo = MockUserRepository::new();
        repo.expect_user_exists()
            .with(eq(UserId(42)))
            .returning(|_| Ok(false));

        assert!(matches!(
            ensure_user_exists(&repo, UserId(42)),
            Err(HubError::ReferenceNotFound { entity: "user", .. })
        ));
    }
}
