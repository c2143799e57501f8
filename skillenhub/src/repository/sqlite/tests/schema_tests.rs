use crate::error::HubError;
use crate::models::core::UserId;
use crate::repository::database_manager::{DatabaseConfig, DatabaseManager};
use crate::repository::sqlite::tests::{create_test_user, test_database_manager};
use crate::repository::sqlite::{
    load_seed_data, schema_sql, table_names, SeedOutcome, SEED_USER_EMAIL, SEED_USER_ID,
};
use crate::repository::user_repository::UserRepository;
use crate::repository::SharedSqliteConnection;

fn existing_tables(conn: &SharedSqliteConnection) -> Result<Vec<String>, HubError> {
    let conn = conn.lock().map_err(|_| HubError::LockPoisoned)?;
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn raw_insert(conn: &SharedSqliteConnection, sql: &str) -> Result<usize, HubError> {
    let conn = conn.lock().map_err(|_| HubError::LockPoisoned)?;
    conn.execute(sql, []).map_err(|e| HubError::from_write("raw", e))
}

#[test]
fn test_all_tables_are_created() -> Result<(), HubError> {
    let db_manager = test_database_manager()?;
    let tables = existing_tables(&db_manager.get_connection())?;

    let mut expected: Vec<String> = table_names().iter().map(ToString::to_string).collect();
    expected.sort();
    assert_eq!(tables, expected);
    assert_eq!(tables.len(), 12);
    Ok(())
}

#[test]
fn test_check_constraints_reject_unknown_enum_values() -> Result<(), HubError> {
    let db_manager = test_database_manager()?;
    let conn = db_manager.get_connection();

    for sql in [
        "INSERT INTO connections (sender_id, receiver_id, status) VALUES (1, 2, 'blocked')",
        "INSERT INTO applications (user_id, opportunity_id, status) VALUES (1, 1, 'pending')",
        "INSERT INTO opportunities (title, company, job_type, description) VALUES ('t', 'c', 'contract', 'd')",
        "INSERT INTO events (title, type, event_date) VALUES ('t', 'meetup', '2026-01-01 10:00:00')",
        "INSERT INTO notifications (user_id, message, type) VALUES (1, 'm', 'alert')",
        "INSERT INTO users (full_name, email, password_hash, role) VALUES ('n', 'e@x.com', 'h', 'user')",
    ] {
        let result = raw_insert(&conn, sql);
        assert!(
            matches!(result, Err(HubError::CheckViolation(_))),
            "'{sql}' should violate a check constraint, got {result:?}"
        );
    }
    Ok(())
}

#[test]
fn test_missing_required_column_is_rejected() -> Result<(), HubError> {
    let db_manager = test_database_manager()?;
    let result = raw_insert(
        &db_manager.get_connection(),
        "INSERT INTO posts (user_id) VALUES (1)",
    );
    assert!(matches!(result, Err(HubError::CheckViolation(_))));
    Ok(())
}

#[test]
fn test_seed_data_is_loaded_once() -> Result<(), HubError> {
    let db_manager = test_database_manager()?;
    let conn = db_manager.get_connection();

    // Loading again must neither fail nor duplicate the row
    assert_eq!(load_seed_data(&conn)?, SeedOutcome::AlreadyPresent);
    assert_eq!(load_seed_data(&conn)?, SeedOutcome::AlreadyPresent);

    let count: i64 = {
        let conn = conn.lock().map_err(|_| HubError::LockPoisoned)?;
        conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            [SEED_USER_EMAIL],
            |row| row.get(0),
        )?
    };
    assert_eq!(count, 1);
    Ok(())
}

#[test]
fn test_seed_reports_id_taken_by_another_user() -> Result<(), HubError> {
    let db_manager = DatabaseManager::with_seed(&DatabaseConfig::SqliteInMemory, false)?;
    let first = create_test_user(&db_manager, "early@x.com")?;
    assert_eq!(first.value(), SEED_USER_ID);

    let conn = db_manager.get_connection();
    assert_eq!(load_seed_data(&conn)?, SeedOutcome::Conflict);

    let emails: Vec<String> = {
        let conn = conn.lock().map_err(|_| HubError::LockPoisoned)?;
        let mut stmt = conn.prepare("SELECT email FROM users ORDER BY id")?;
        let emails = stmt.query_map([], |row| row.get(0))?;
        emails.collect::<Result<Vec<_>, _>>()?
    };
    assert_eq!(emails, vec!["early@x.com".to_string()]);
    Ok(())
}

#[test]
fn test_seed_reports_email_taken_by_another_user() -> Result<(), HubError> {
    let db_manager = DatabaseManager::with_seed(&DatabaseConfig::SqliteInMemory, false)?;
    create_test_user(&db_manager, "placeholder@x.com")?;
    create_test_user(&db_manager, &SEED_USER_EMAIL.to_uppercase())?;
    db_manager
        .create_user_repository()
        .delete_user(UserId(SEED_USER_ID))?;

    let conn = db_manager.get_connection();
    assert_eq!(load_seed_data(&conn)?, SeedOutcome::Conflict);
    Ok(())
}

#[test]
fn test_seed_loads_into_empty_database() -> Result<(), HubError> {
    let db_manager = DatabaseManager::with_seed(&DatabaseConfig::SqliteInMemory, false)?;
    assert_eq!(
        load_seed_data(&db_manager.get_connection())?,
        SeedOutcome::Loaded
    );
    Ok(())
}

#[test]
fn test_schema_sql_contains_every_table() {
    let sql = schema_sql();
    for table in table_names() {
        assert!(
            sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
            "schema script lacks {table}"
        );
    }
}
