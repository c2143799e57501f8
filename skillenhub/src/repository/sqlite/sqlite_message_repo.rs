use crate::error::HubError;
use crate::models::core::{MessageId, UserId};
use crate::models::message::{Message, MessageUpdate, NewMessage};
use crate::repository::message_repository::MessageRepository;
use crate::repository::sqlite::{count_rows, delete_row, timestamp, PartialUpdate};
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteMessageRepository {
    connection: SharedSqliteConnection,
}

impl SqliteMessageRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `messages` table.
pub(crate) const CREATE_MESSAGES_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS messages (
    id integer primary key autoincrement not null,
    sender_id integer not null,
    receiver_id integer not null,
    message text not null,
    is_read boolean not null default 0,
    created_at datetime not null default current_timestamp
);
CREATE INDEX IF NOT EXISTS idx_messages_pair ON messages (sender_id, receiver_id);
";

const MESSAGE_COLUMNS: &str = "id, sender_id, receiver_id, message, is_read, created_at";

const CONVERSATION_FILTER: &str =
    "(sender_id = ?1 AND receiver_id = ?2) OR (sender_id = ?2 AND receiver_id = ?1)";

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        receiver_id: row.get(2)?,
        message: row.get(3)?,
        is_read: row.get(4)?,
        created_at: timestamp(row, 5)?,
    })
}

impl MessageRepository for SqliteMessageRepository {
    fn create_message(&self, message: &NewMessage) -> Result<MessageId, HubError> {
        debug!(
            "Storing message from {} to {}",
            message.sender_id, message.receiver_id
        );
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = conn
            .query_row(
                "INSERT INTO messages (sender_id, receiver_id, message) VALUES (?1, ?2, ?3) RETURNING id",
                params![message.sender_id, message.receiver_id, message.message],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("messages", e))?;
        Ok(id)
    }

    fn find_message_by_id(&self, id: MessageId) -> Result<Message, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1");
        conn.query_row(&sql, params![id], message_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(MessageId::ENTITY, id))
    }

    fn find_conversation(&self, first: UserId, second: UserId) -> Result<Vec<Message>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE {CONVERSATION_FILTER} ORDER BY created_at ASC, id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let messages = stmt
            .query_map(params![first, second], message_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(messages)
    }

    fn find_last_message(
        &self,
        first: UserId,
        second: UserId,
    ) -> Result<Option<Message>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE {CONVERSATION_FILTER} ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let message = conn
            .query_row(&sql, params![first, second], message_from_row)
            .optional()?;
        Ok(message)
    }

    fn update_message(&self, id: MessageId, update: &MessageUpdate) -> Result<(), HubError> {
        let mut partial = PartialUpdate::new("messages", MessageId::ENTITY);
        partial.set("is_read", update.is_read);
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn delete_message(&self, id: MessageId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "messages", MessageId::ENTITY, id.value())
    }

    fn mark_conversation_read(&self, receiver: UserId, sender: UserId) -> Result<usize, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "UPDATE messages SET is_read = 1 WHERE receiver_id = ?1 AND sender_id = ?2 AND is_read = 0",
            params![receiver, sender],
        )?;
        debug!("Marked {rows_affected} messages from {sender} to {receiver} as read");
        Ok(rows_affected)
    }

    fn count_unread_for(&self, receiver: UserId) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(
            &conn,
            "SELECT COUNT(*) FROM messages WHERE receiver_id = ?1 AND is_read = 0",
            &[&receiver],
        )
    }
}
