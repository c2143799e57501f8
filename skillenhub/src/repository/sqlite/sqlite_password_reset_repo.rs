use crate::error::HubError;
use crate::models::core::PasswordResetId;
use crate::models::password_reset::{NewPasswordReset, PasswordReset, PasswordResetUpdate};
use crate::repository::password_reset_repository::PasswordResetRepository;
use crate::repository::sqlite::{delete_row, timestamp, to_db_time, PartialUpdate};
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqlitePasswordResetRepository {
    connection: SharedSqliteConnection,
}

impl SqlitePasswordResetRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `password_resets` table.
pub(crate) const CREATE_PASSWORD_RESETS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS password_resets (
    id integer primary key autoincrement not null,
    email varchar(100) not null collate nocase,
    otp_code varchar(10) not null,
    created_at datetime not null default current_timestamp,
    expires_at datetime not null
);
CREATE INDEX IF NOT EXISTS idx_password_resets_email ON password_resets (email);
";

const RESET_COLUMNS: &str = "id, email, otp_code, created_at, expires_at";

fn reset_from_row(row: &Row<'_>) -> rusqlite::Result<PasswordReset> {
    Ok(PasswordReset {
        id: row.get(0)?,
        email: row.get(1)?,
        otp_code: row.get(2)?,
        created_at: timestamp(row, 3)?,
        expires_at: timestamp(row, 4)?,
    })
}

impl PasswordResetRepository for SqlitePasswordResetRepository {
    fn create_password_reset(
        &self,
        reset: &NewPasswordReset,
    ) -> Result<PasswordResetId, HubError> {
        debug!("Storing password reset code for {}", reset.email);
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = conn
            .query_row(
                "INSERT INTO password_resets (email, otp_code, expires_at) VALUES (?1, ?2, ?3) RETURNING id",
                params![reset.email, reset.otp_code, to_db_time(&reset.expires_at)],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("password_resets", e))?;
        Ok(id)
    }

    fn find_password_reset_by_id(&self, id: PasswordResetId) -> Result<PasswordReset, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {RESET_COLUMNS} FROM password_resets WHERE id = ?1");
        conn.query_row(&sql, params![id], reset_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(PasswordResetId::ENTITY, id))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<PasswordReset>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            "SELECT {RESET_COLUMNS} FROM password_resets WHERE email = ?1 ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let reset = conn
            .query_row(&sql, params![email], reset_from_row)
            .optional()?;
        Ok(reset)
    }

    fn find_by_email_and_code(
        &self,
        email: &str,
        otp_code: &str,
    ) -> Result<Option<PasswordReset>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            r"SELECT {RESET_COLUMNS} FROM password_resets
              WHERE email = ?1 AND otp_code = ?2
              ORDER BY created_at DESC, id DESC
              LIMIT 1"
        );
        let reset = conn
            .query_row(&sql, params![email, otp_code], reset_from_row)
            .optional()?;
        Ok(reset)
    }

    fn update_password_reset(
        &self,
        id: PasswordResetId,
        update: &PasswordResetUpdate,
    ) -> Result<(), HubError> {
        let mut partial = PartialUpdate::new("password_resets", PasswordResetId::ENTITY);
        partial
            .set("otp_code", update.otp_code.clone())
            .set("expires_at", update.expires_at.as_ref().map(to_db_time));
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn delete_password_reset(&self, id: PasswordResetId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "password_resets", PasswordResetId::ENTITY, id.value())
    }

    fn delete_by_email(&self, email: &str) -> Result<usize, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected =
            conn.execute("DELETE FROM password_resets WHERE email = ?1", params![email])?;
        debug!("Removed {rows_affected} password reset codes for {email}");
        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::sqlite::tests::test_database_manager;
    use chrono::{Duration, TimeZone, Utc};

    fn reset(email: &str, code: &str) -> NewPasswordReset {
        NewPasswordReset {
            email: email.to_string(),
            otp_code: code.to_string(),
            expires_at: Utc::now() + Duration::minutes(10),
        }
    }

    #[test]
    fn latest_code_wins_lookup_by_email() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_password_reset_repository();
        repo.create_password_reset(&reset("a@x.com", "111111"))?;
        let latest = repo.create_password_reset(&reset("a@x.com", "222222"))?;

        let found = repo.find_by_email("A@X.com")?;
        assert_eq!(found.map(|r| r.id), Some(latest));
        assert!(repo.find_by_email("b@x.com")?.is_none());
        Ok(())
    }

    #[test]
    fn lookup_requires_matching_code() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_password_reset_repository();
        repo.create_password_reset(&reset("a@x.com", "123456"))?;
        assert!(repo.find_by_email_and_code("a@x.com", "123456")?.is_some());
        assert!(repo.find_by_email_and_code("a@x.com", "654321")?.is_none());
        Ok(())
    }

    #[test]
    fn expired_rows_are_still_returned() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_password_reset_repository();
        let expires_at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let id = repo.create_password_reset(&NewPasswordReset {
            email: "old@x.com".to_string(),
            otp_code: "000000".to_string(),
            expires_at,
        })?;
        let stored = repo.find_password_reset_by_id(id)?;
        assert_eq!(stored.expires_at, expires_at);
        assert!(stored.is_expired(Utc::now()));

        let extended = Utc::now() + Duration::minutes(5);
        repo.update_password_reset(
            id,
            &PasswordResetUpdate {
                expires_at: Some(extended),
                ..Default::default()
            },
        )?;
        assert!(!repo.find_password_reset_by_id(id)?.is_expired(Utc::now()));
        Ok(())
    }

    #[test]
    fn delete_by_email_removes_every_code() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_password_reset_repository();
        repo.create_password_reset(&reset("a@x.com", "1"))?;
        repo.create_password_reset(&reset("a@x.com", "2"))?;
        let other = repo.create_password_reset(&reset("b@x.com", "3"))?;

        assert_eq!(repo.delete_by_email("a@x.com")?, 2);
        assert_eq!(repo.delete_by_email("a@x.com")?, 0);
        repo.delete_password_reset(other)?;
        assert!(matches!(
            repo.find_password_reset_by_id(other),
            Err(HubError::NotFound { entity: "password reset", .. })
        ));
        Ok(())
    }
}
