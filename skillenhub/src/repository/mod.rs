use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// Application repository modules, each representing specific database entity operations.
pub mod application_repository;
pub mod comment_repository;
pub mod connection_repository;
pub mod event_repository;
pub mod like_repository;
pub mod message_repository;
pub mod notification_repository;
pub mod opportunity_repository;
pub mod password_reset_repository;
pub mod post_repository;
pub mod registration_repository;
pub mod user_repository;

// Database-related utilities and managers.
pub mod database_manager;
pub(crate) mod sqlite;

/// A thread-safe, shared connection to an ``SQLite`` database,
/// used across multiple repository layers.
pub(crate) type SharedSqliteConnection = Arc<Mutex<Connection>>;
