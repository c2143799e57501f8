use crate::error::HubError;
use crate::models::core::UserId;
use crate::models::user::{NewUser, User, UserUpdate};
use crate::repository::sqlite::{
    count_rows, delete_row, enum_column, limit_param, row_exists, timestamp, PartialUpdate,
};
use crate::repository::user_repository::UserRepository;
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteUserRepository {
    connection: SharedSqliteConnection,
}

impl SqliteUserRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `users` table.
pub(crate) const CREATE_USERS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id integer primary key autoincrement not null,
    full_name varchar(100) not null,
    email varchar(100) not null collate nocase unique,
    password_hash varchar(255) not null,
    role varchar(16) not null default 'student' check (role in ('student', 'admin', '')),
    profile_pic varchar(255),
    bio text,
    education varchar(255),
    skills text,
    github_link varchar(255),
    linkedin_link varchar(255),
    resume_file varchar(255),
    created_at datetime not null default current_timestamp
);
";

const USER_COLUMNS: &str = "id, full_name, email, password_hash, role, profile_pic, bio, \
     education, skills, github_link, linkedin_link, resume_file, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: enum_column(row, 4)?,
        profile_pic: row.get(5)?,
        bio: row.get(6)?,
        education: row.get(7)?,
        skills: row.get(8)?,
        github_link: row.get(9)?,
        linkedin_link: row.get(10)?,
        resume_file: row.get(11)?,
        created_at: timestamp(row, 12)?,
    })
}

impl UserRepository for SqliteUserRepository {
    fn create_user(&self, user: &NewUser) -> Result<UserId, HubError> {
        debug!("Inserting user {}", user.email);
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = conn
            .query_row(
                r"INSERT INTO users (full_name, email, password_hash, role)
                  VALUES (?1, ?2, ?3, ?4)
                  RETURNING id",
                params![
                    user.full_name,
                    user.email,
                    user.password_hash,
                    user.role.unwrap_or_default().as_str()
                ],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("users", e))?;
        Ok(id)
    }

    fn find_user_by_id(&self, id: UserId) -> Result<User, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        conn.query_row(&sql, params![id], user_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(UserId::ENTITY, id))
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
        let user = conn
            .query_row(&sql, params![email.trim()], user_from_row)
            .optional()?;
        Ok(user)
    }

    fn list_users(&self, limit: Option<usize>) -> Result<Vec<User>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql =
            format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC LIMIT ?1");
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt
            .query_map(params![limit_param(limit)], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<(), HubError> {
        debug!("Updating user {id}");
        let mut partial = PartialUpdate::new("users", UserId::ENTITY);
        partial
            .set("full_name", update.full_name.clone())
            .set("email", update.email.clone())
            .set("password_hash", update.password_hash.clone())
            .set("role", update.role.map(|role| role.as_str()))
            .set("profile_pic", update.profile_pic.clone())
            .set("bio", update.bio.clone())
            .set("education", update.education.clone())
            .set("skills", update.skills.clone())
            .set("github_link", update.github_link.clone())
            .set("linkedin_link", update.linkedin_link.clone())
            .set("resume_file", update.resume_file.clone());

        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn update_password_by_email(&self, email: &str, password_hash: &str) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn
            .execute(
                "UPDATE users SET password_hash = ?1 WHERE email = ?2",
                params![password_hash, email.trim()],
            )
            .map_err(|e| HubError::from_write("users", e))?;
        if rows_affected == 0 {
            return Err(HubError::not_found(UserId::ENTITY, email));
        }
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> Result<(), HubError> {
        debug!("Deleting user {id}");
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "users", UserId::ENTITY, id.value())
    }

    fn user_exists(&self, id: UserId) -> Result<bool, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        row_exists(&conn, "users", id.value())
    }

    fn count_users(&self) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(&conn, "SELECT COUNT(*) FROM users", &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::repository::sqlite::tests::test_database_manager;
    use crate::repository::sqlite::{SEED_USER_EMAIL, SEED_USER_ID};

    #[test]
    fn test_add_user() -> Result<(), HubError> {
        let db_manager = test_database_manager()?;
        let user_repo = db_manager.create_user_repository();

        let id = user_repo.create_user(&NewUser::new(
            "Steinar Overbeck Cook",
            "steinar@gastroplanner.no",
            "pbkdf2:sha256:600000$hash",
        ))?;

        let dbms_usr = user_repo.find_user_by_id(id)?;
        assert_eq!(dbms_usr.id, id);
        assert_eq!(dbms_usr.full_name, "Steinar Overbeck Cook");
        assert_eq!(dbms_usr.email, "steinar@gastroplanner.no");
        assert_eq!(dbms_usr.password_hash, "pbkdf2:sha256:600000$hash");
        assert_eq!(dbms_usr.role, Role::Student, "role should default to student");
        assert!(dbms_usr.bio.is_none());

        Ok(())
    }

    #[test]
    fn duplicate_email_is_rejected() -> Result<(), HubError> {
        let user_repo = test_database_manager()?.create_user_repository();
        user_repo.create_user(&NewUser::new("A", "a@x.com", "h"))?;

        let result = user_repo.create_user(&NewUser::new("B", "a@x.com", "h"));
        assert!(
            matches!(result, Err(HubError::UniqueConstraintViolation { ref table, .. }) if table == "users"),
            "expected a unique constraint violation, got {result:?}"
        );
        Ok(())
    }

    #[test]
    fn email_uniqueness_ignores_case() -> Result<(), HubError> {
        let user_repo = test_database_manager()?.create_user_repository();
        user_repo.create_user(&NewUser::new("A", "a@x.com", "h"))?;

        let result = user_repo.create_user(&NewUser::new("B", "A@X.com", "h"));
        assert!(matches!(
            result,
            Err(HubError::UniqueConstraintViolation { .. })
        ));

        let found = user_repo.find_user_by_email("A@x.COM")?;
        assert_eq!(found.map(|u| u.full_name), Some("A".to_string()));
        Ok(())
    }

    #[test]
    fn seed_user_is_present_with_blank_role() -> Result<(), HubError> {
        let user_repo = test_database_manager()?.create_user_repository();

        let seed = user_repo.find_user_by_id(UserId(SEED_USER_ID))?;
        assert_eq!(seed.email, SEED_USER_EMAIL);
        assert_eq!(seed.role, Role::Unassigned);
        assert!(!seed.is_admin());
        Ok(())
    }

    #[test]
    fn partial_update_only_touches_given_columns() -> Result<(), HubError> {
        let user_repo = test_database_manager()?.create_user_repository();
        let id = user_repo.create_user(&NewUser::new("Ada", "ada@x.com", "h"))?;

        user_repo.update_user(
            id,
            &UserUpdate {
                bio: Some(Some("Compilers".to_string())),
                role: Some(Role::Admin),
                ..Default::default()
            },
        )?;
        let user = user_repo.find_user_by_id(id)?;
        assert_eq!(user.bio.as_deref(), Some("Compilers"));
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.full_name, "Ada");

        user_repo.update_user(
            id,
            &UserUpdate {
                bio: Some(None),
                ..Default::default()
            },
        )?;
        assert!(user_repo.find_user_by_id(id)?.bio.is_none());
        Ok(())
    }

    #[test]
    fn update_and_delete_of_absent_user_fail_with_not_found() -> Result<(), HubError> {
        let user_repo = test_database_manager()?.create_user_repository();

        let update = user_repo.update_user(
            UserId(999),
            &UserUpdate {
                full_name: Some("Nobody".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(update, Err(HubError::NotFound { entity: "user", .. })));
        assert!(matches!(
            user_repo.update_user(UserId(999), &UserUpdate::default()),
            Err(HubError::NotFound { .. })
        ));
        assert!(matches!(
            user_repo.delete_user(UserId(999)),
            Err(HubError::NotFound { .. })
        ));
        assert!(matches!(
            user_repo.find_user_by_id(UserId(999)),
            Err(HubError::NotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn list_users_newest_first() -> Result<(), HubError> {
        let user_repo = test_database_manager()?.create_user_repository();
        let first = user_repo.create_user(&NewUser::new("First", "first@x.com", "h"))?;
        let second = user_repo.create_user(&NewUser::new("Second", "second@x.com", "h"))?;

        let users = user_repo.list_users(Some(2))?;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, second);
        assert_eq!(users[1].id, first);

        // Seed user plus the two above
        assert_eq!(user_repo.count_users()?, 3);
        assert_eq!(user_repo.list_users(None)?.len(), 3);
        Ok(())
    }

    #[test]
    fn password_hash_is_replaced_by_email() -> Result<(), HubError> {
        let user_repo = test_database_manager()?.create_user_repository();
        let id = user_repo.create_user(&NewUser::new("Ada", "ada@x.com", "old"))?;

        user_repo.update_password_by_email("ADA@x.com", "new")?;
        assert_eq!(user_repo.find_user_by_id(id)?.password_hash, "new");
        assert!(matches!(
            user_repo.update_password_by_email("ghost@x.com", "new"),
            Err(HubError::NotFound { .. })
        ));
        Ok(())
    }
}
