pub mod configuration;
pub mod init;
pub mod password_reset;
pub mod schema;
pub mod stats;
pub mod users;
