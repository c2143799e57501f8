use crate::error::HubError;
use crate::repository::SharedSqliteConnection;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, info, warn};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub(crate) mod sqlite_application_repo;
pub(crate) mod sqlite_comment_repo;
pub(crate) mod sqlite_connection_repo;
pub(crate) mod sqlite_event_repo;
pub(crate) mod sqlite_like_repo;
pub(crate) mod sqlite_message_repo;
pub(crate) mod sqlite_notification_repo;
pub(crate) mod sqlite_opportunity_repo;
pub(crate) mod sqlite_password_reset_repo;
pub(crate) mod sqlite_post_repo;
pub(crate) mod sqlite_registration_repo;
pub(crate) mod sqlite_user_repo;

/// Id, e-mail and (blank) role of the demo account shipped with the schema
pub const SEED_USER_ID: i64 = 1;
pub const SEED_USER_EMAIL: &str = "vyomfinaviya21@gmail.com";
pub const SEED_USER_NAME: &str = "Vyom Finaviya";

/// DDL statements of every table, in creation order.
const TABLES: [(&str, &str); 12] = [
    ("users", sqlite_user_repo::CREATE_USERS_TABLE_SQL),
    ("posts", sqlite_post_repo::CREATE_POSTS_TABLE_SQL),
    ("comments", sqlite_comment_repo::CREATE_COMMENTS_TABLE_SQL),
    ("likes", sqlite_like_repo::CREATE_LIKES_TABLE_SQL),
    (
        "connections",
        sqlite_connection_repo::CREATE_CONNECTIONS_TABLE_SQL,
    ),
    ("messages", sqlite_message_repo::CREATE_MESSAGES_TABLE_SQL),
    (
        "notifications",
        sqlite_notification_repo::CREATE_NOTIFICATIONS_TABLE_SQL,
    ),
    (
        "opportunities",
        sqlite_opportunity_repo::CREATE_OPPORTUNITIES_TABLE_SQL,
    ),
    (
        "applications",
        sqlite_application_repo::CREATE_APPLICATIONS_TABLE_SQL,
    ),
    ("events", sqlite_event_repo::CREATE_EVENTS_TABLE_SQL),
    (
        "event_registrations",
        sqlite_registration_repo::CREATE_EVENT_REGISTRATIONS_TABLE_SQL,
    ),
    (
        "password_resets",
        sqlite_password_reset_repo::CREATE_PASSWORD_RESETS_TABLE_SQL,
    ),
];

/// Names of all tables in the schema
#[must_use]
pub fn table_names() -> Vec<&'static str> {
    TABLES.iter().map(|(name, _)| *name).collect()
}

/// The complete DDL of the schema as a single script
#[must_use]
pub fn schema_sql() -> String {
    TABLES
        .iter()
        .map(|(_, sql)| sql.trim())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Creates the entire database schema by running the DDL of every entity.
#[allow(clippy::module_name_repetitions)]
pub(crate) fn create_schema(connection: &SharedSqliteConnection) -> Result<(), HubError> {
    let conn = connection.lock().map_err(|_| HubError::LockPoisoned)?;
    for (table, sql) in &TABLES {
        debug!("Creating table {table}");
        conn.execute_batch(sql)
            .map_err(|e| HubError::Sql(format!("Unable to create table {table}: {e}")))?;
    }
    info!("Schema with {} tables is in place", TABLES.len());
    Ok(())
}

/// What happened to the demo user row when the seed data was loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SeedOutcome {
    Loaded,
    AlreadyPresent,
    /// Id 1 or the seed e-mail is taken by another account
    Conflict,
}

/// Loads the demo user row. Running it more than once has no effect.
///
/// The row keeps the blank role it was published with; it is neither `student`
/// nor `admin`.
pub(crate) fn load_seed_data(
    connection: &SharedSqliteConnection,
) -> Result<SeedOutcome, HubError> {
    let conn = connection.lock().map_err(|_| HubError::LockPoisoned)?;
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO users (id, full_name, email, password_hash, role)
             VALUES (?1, ?2, ?3, '', '')",
            params![SEED_USER_ID, SEED_USER_NAME, SEED_USER_EMAIL],
        )
        .map_err(|e| HubError::from_write("users", e))?;
    if inserted > 0 {
        info!("Loaded seed user {SEED_USER_EMAIL} with id {SEED_USER_ID}");
        warn!("Seed user {SEED_USER_EMAIL} has a blank role, neither 'student' nor 'admin'");
        return Ok(SeedOutcome::Loaded);
    }

    let holder_email: Option<String> = conn
        .query_row(
            "SELECT email FROM users WHERE id = ?1",
            params![SEED_USER_ID],
            |row| row.get(0),
        )
        .optional()?;
    match holder_email {
        Some(email) if email.eq_ignore_ascii_case(SEED_USER_EMAIL) => {
            debug!("Seed user {SEED_USER_EMAIL} already present");
            Ok(SeedOutcome::AlreadyPresent)
        }
        Some(other) => {
            warn!("Seed user {SEED_USER_EMAIL} not loaded, id {SEED_USER_ID} belongs to {other}");
            Ok(SeedOutcome::Conflict)
        }
        None => {
            warn!("Seed user not loaded, {SEED_USER_EMAIL} is registered under another id");
            Ok(SeedOutcome::Conflict)
        }
    }
}

pub(crate) fn create_connection(dbms_path: &Path) -> Result<Connection, HubError> {
    if let Some(parent) = dbms_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let connection = Connection::open(dbms_path).map_err(|e| HubError::OpenDbms {
        path: dbms_path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;
    Ok(connection)
}

/// Timestamps are written in the same layout `CURRENT_TIMESTAMP` produces, in UTC.
pub(crate) fn to_db_time(ts: &DateTime<Utc>) -> NaiveDateTime {
    ts.naive_utc()
}

pub(crate) fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    Ok(row.get::<_, NaiveDateTime>(idx)?.and_utc())
}

pub(crate) fn opt_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    Ok(row
        .get::<_, Option<NaiveDateTime>>(idx)?
        .map(|naive| naive.and_utc()))
}

/// Parses an enumerated column, reporting unknown literals as a conversion failure.
pub(crate) fn enum_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = HubError>,
{
    let value: String = row.get(idx)?;
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// SQLite treats a negative LIMIT as no limit at all.
pub(crate) fn limit_param(limit: Option<usize>) -> i64 {
    limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX))
}

pub(crate) fn row_exists(conn: &Connection, table: &str, id: i64) -> Result<bool, HubError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    let exists: bool = conn.query_row(&sql, params![id], |row| row.get(0))?;
    Ok(exists)
}

pub(crate) fn count_rows(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<i64, HubError> {
    let count = conn
        .query_row(sql, params, |row| row.get(0))
        .map_err(|e| HubError::Sql(format!("Unable to count rows with '{sql}': {e}")))?;
    Ok(count)
}

/// Deletes the row with `id` from `table`, failing with `NotFound` if there is none.
pub(crate) fn delete_row(
    conn: &Connection,
    table: &str,
    entity: &'static str,
    id: i64,
) -> Result<(), HubError> {
    let sql = format!("DELETE FROM {table} WHERE id = ?1");
    let rows_affected = conn.execute(&sql, params![id])?;
    if rows_affected == 0 {
        return Err(HubError::not_found(entity, id));
    }
    Ok(())
}

/// Collects the columns of a partial update and runs it as a single statement.
///
/// Only the columns that were given a value end up in the `SET` clause.
pub(crate) struct PartialUpdate {
    table: &'static str,
    entity: &'static str,
    assignments: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl PartialUpdate {
    pub(crate) fn new(table: &'static str, entity: &'static str) -> Self {
        Self {
            table,
            entity,
            assignments: Vec::new(),
            params: Vec::new(),
        }
    }

    pub(crate) fn set<T: ToSql + 'static>(&mut self, column: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.params.push(Box::new(value));
            self.assignments
                .push(format!("{column} = ?{}", self.params.len()));
        }
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Runs the update on the row with `id`.
    ///
    /// An update without any column still verifies that the row exists.
    pub(crate) fn execute(mut self, conn: &Connection, id: i64) -> Result<(), HubError> {
        if self.is_empty() {
            return if row_exists(conn, self.table, id)? {
                Ok(())
            } else {
                Err(HubError::not_found(self.entity, id))
            };
        }

        self.params.push(Box::new(id));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            self.table,
            self.assignments.join(", "),
            self.params.len()
        );
        debug!("PartialUpdate::execute():- {sql}");

        let params_slice: Vec<&dyn ToSql> = self.params.iter().map(AsRef::as_ref).collect();
        let rows_affected = conn
            .execute(&sql, params_slice.as_slice())
            .map_err(|e| HubError::from_write(self.table, e))?;
        if rows_affected == 0 {
            return Err(HubError::not_found(self.entity, id));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests;
