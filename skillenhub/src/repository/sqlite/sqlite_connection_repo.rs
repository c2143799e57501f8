use crate::error::HubError;
use crate::models::connection::{
    Connection, ConnectionPeer, ConnectionStatus, ConnectionUpdate, IncomingRequest,
    NewConnection,
};
use crate::models::core::{ConnectionId, UserId};
use crate::repository::connection_repository::ConnectionRepository;
use crate::repository::sqlite::{count_rows, delete_row, enum_column, timestamp, PartialUpdate};
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteConnectionRepository {
    connection: SharedSqliteConnection,
}

impl SqliteConnectionRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `connections` table.
pub(crate) const CREATE_CONNECTIONS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS connections (
    id integer primary key autoincrement not null,
    sender_id integer not null,
    receiver_id integer not null,
    status varchar(16) not null default 'pending'
        check (status in ('pending', 'accepted', 'rejected')),
    created_at datetime not null default current_timestamp
);
CREATE INDEX IF NOT EXISTS idx_connections_sender ON connections (sender_id);
CREATE INDEX IF NOT EXISTS idx_connections_receiver ON connections (receiver_id);
";

const CONNECTION_COLUMNS: &str = "id, sender_id, receiver_id, status, created_at";

fn connection_from_row(row: &Row<'_>) -> rusqlite::Result<Connection> {
    Ok(Connection {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        receiver_id: row.get(2)?,
        status: enum_column(row, 3)?,
        created_at: timestamp(row, 4)?,
    })
}

impl ConnectionRepository for SqliteConnectionRepository {
    fn create_connection(&self, connection: &NewConnection) -> Result<ConnectionId, HubError> {
        debug!(
            "Connection request from {} to {}",
            connection.sender_id, connection.receiver_id
        );
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = match connection.status {
            Some(status) => conn.query_row(
                "INSERT INTO connections (sender_id, receiver_id, status) VALUES (?1, ?2, ?3) RETURNING id",
                params![connection.sender_id, connection.receiver_id, status.as_str()],
                |row| row.get(0),
            ),
            None => conn.query_row(
                "INSERT INTO connections (sender_id, receiver_id) VALUES (?1, ?2) RETURNING id",
                params![connection.sender_id, connection.receiver_id],
                |row| row.get(0),
            ),
        }
        .map_err(|e| HubError::from_write("connections", e))?;
        Ok(id)
    }

    fn find_connection_by_id(&self, id: ConnectionId) -> Result<Connection, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = ?1");
        conn.query_row(&sql, params![id], connection_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(ConnectionId::ENTITY, id))
    }

    fn find_connection_between(
        &self,
        first: UserId,
        second: UserId,
    ) -> Result<Option<Connection>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            r"SELECT {CONNECTION_COLUMNS} FROM connections
              WHERE (sender_id = ?1 AND receiver_id = ?2) OR (sender_id = ?2 AND receiver_id = ?1)
              ORDER BY created_at DESC, id DESC
              LIMIT 1"
        );
        let connection = conn
            .query_row(&sql, params![first, second], connection_from_row)
            .optional()?;
        Ok(connection)
    }

    fn find_incoming_requests(&self, receiver: UserId) -> Result<Vec<IncomingRequest>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            r"SELECT c.id, c.sender_id, u.full_name, u.profile_pic, c.created_at
              FROM connections c
              INNER JOIN users u ON c.sender_id = u.id
              WHERE c.receiver_id = ?1 AND c.status = 'pending'
              ORDER BY c.created_at DESC, c.id DESC",
        )?;
        let requests = stmt
            .query_map(params![receiver], |row| {
                Ok(IncomingRequest {
                    connection_id: row.get(0)?,
                    sender_id: row.get(1)?,
                    sender_name: row.get(2)?,
                    sender_pic: row.get(3)?,
                    created_at: timestamp(row, 4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(requests)
    }

    fn find_accepted_peers(&self, user_id: UserId) -> Result<Vec<ConnectionPeer>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            r"SELECT c.id, u.id, u.full_name, u.profile_pic, u.bio, c.created_at
              FROM connections c
              INNER JOIN users u
                  ON u.id = CASE WHEN c.sender_id = ?1 THEN c.receiver_id ELSE c.sender_id END
              WHERE (c.sender_id = ?1 OR c.receiver_id = ?1) AND c.status = 'accepted'
              ORDER BY u.full_name COLLATE NOCASE, u.id",
        )?;
        let peers = stmt
            .query_map(params![user_id], |row| {
                Ok(ConnectionPeer {
                    connection_id: row.get(0)?,
                    user_id: row.get(1)?,
                    full_name: row.get(2)?,
                    profile_pic: row.get(3)?,
                    bio: row.get(4)?,
                    connected_since: timestamp(row, 5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(peers)
    }

    fn update_connection(
        &self,
        id: ConnectionId,
        update: &ConnectionUpdate,
    ) -> Result<(), HubError> {
        let mut partial = PartialUpdate::new("connections", ConnectionId::ENTITY);
        partial.set("status", update.status.map(|s| s.as_str()));
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn delete_connection(&self, id: ConnectionId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "connections", ConnectionId::ENTITY, id.value())
    }

    fn count_outgoing_pending(&self, sender: UserId) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(
            &conn,
            "SELECT COUNT(*) FROM connections WHERE sender_id = ?1 AND status = ?2",
            &[&sender, &ConnectionStatus::Pending.as_str()],
        )
    }

    fn count_incoming_pending(&self, receiver: UserId) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(
            &conn,
            "SELECT COUNT(*) FROM connections WHERE receiver_id = ?1 AND status = ?2",
            &[&receiver, &ConnectionStatus::Pending.as_str()],
        )
    }

    fn count_accepted(&self, user_id: Option<UserId>) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        match user_id {
            Some(user_id) => count_rows(
                &conn,
                r"SELECT COUNT(*) FROM connections
                  WHERE (sender_id = ?1 OR receiver_id = ?1) AND status = 'accepted'",
                &[&user_id],
            ),
            None => count_rows(
                &conn,
                "SELECT COUNT(*) FROM connections WHERE status = 'accepted'",
                &[],
            ),
        }
    }
}
