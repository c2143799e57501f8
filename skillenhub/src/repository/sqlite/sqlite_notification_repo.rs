use crate::error::HubError;
use crate::models::core::{NotificationId, UserId};
use crate::models::notification::{NewNotification, Notification, NotificationUpdate};
use crate::repository::notification_repository::NotificationRepository;
use crate::repository::sqlite::{
    count_rows, delete_row, enum_column, limit_param, timestamp, PartialUpdate,
};
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteNotificationRepository {
    connection: SharedSqliteConnection,
}

impl SqliteNotificationRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `notifications` table.
pub(crate) const CREATE_NOTIFICATIONS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS notifications (
    id integer primary key autoincrement not null,
    user_id integer not null,
    message text not null,
    type varchar(32) not null default 'general'
        check (type in ('connection_request', 'message', 'job_alert', 'general')),
    is_read boolean not null default 0,
    created_at datetime not null default current_timestamp
);
CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications (user_id);
";

const NOTIFICATION_COLUMNS: &str = "id, user_id, message, type, is_read, created_at";

fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        message: row.get(2)?,
        kind: enum_column(row, 3)?,
        is_read: row.get(4)?,
        created_at: timestamp(row, 5)?,
    })
}

impl NotificationRepository for SqliteNotificationRepository {
    fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationId, HubError> {
        debug!(
            "Notifying user {} ({}): {}",
            notification.user_id, notification.kind, notification.message
        );
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = conn
            .query_row(
                "INSERT INTO notifications (user_id, message, type) VALUES (?1, ?2, ?3) RETURNING id",
                params![
                    notification.user_id,
                    notification.message,
                    notification.kind.as_str()
                ],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("notifications", e))?;
        Ok(id)
    }

    fn find_notification_by_id(&self, id: NotificationId) -> Result<Notification, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?1");
        conn.query_row(&sql, params![id], notification_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(NotificationId::ENTITY, id))
    }

    fn find_notifications_for_user(
        &self,
        user_id: UserId,
        limit: Option<usize>,
    ) -> Result<Vec<Notification>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            r"SELECT {NOTIFICATION_COLUMNS} FROM notifications
              WHERE user_id = ?1
              ORDER BY created_at DESC, id DESC
              LIMIT ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let notifications = stmt
            .query_map(params![user_id, limit_param(limit)], notification_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notifications)
    }

    fn update_notification(
        &self,
        id: NotificationId,
        update: &NotificationUpdate,
    ) -> Result<(), HubError> {
        let mut partial = PartialUpdate::new("notifications", NotificationId::ENTITY);
        partial
            .set("message", update.message.clone())
            .set("type", update.kind.map(|k| k.as_str()))
            .set("is_read", update.is_read);
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn delete_notification(&self, id: NotificationId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "notifications", NotificationId::ENTITY, id.value())
    }

    fn mark_read(&self, id: NotificationId, user_id: UserId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if rows_affected == 0 {
            return Err(HubError::not_found(NotificationId::ENTITY, id));
        }
        Ok(())
    }

    fn mark_all_read(&self, user_id: UserId) -> Result<usize, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
            params![user_id],
        )?;
        Ok(rows_affected)
    }

    fn delete_for_user(&self, id: NotificationId, user_id: UserId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "DELETE FROM notifications WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if rows_affected == 0 {
            return Err(HubError::not_found(NotificationId::ENTITY, id));
        }
        Ok(())
    }

    fn delete_all_for_user(&self, user_id: UserId) -> Result<usize, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "DELETE FROM notifications WHERE user_id = ?1",
            params![user_id],
        )?;
        debug!("Deleted {rows_affected} notifications of user {user_id}");
        Ok(rows_affected)
    }

    fn count_unread(&self, user_id: UserId) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(
            &conn,
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
            &[&user_id],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationKind;
    use crate::repository::sqlite::tests::test_database_manager;

    fn notification(user_id: i64, message: &str, kind: NotificationKind) -> NewNotification {
        NewNotification {
            user_id: UserId(user_id),
            message: message.to_string(),
            kind,
        }
    }

    #[test]
    fn notifications_are_scoped_to_their_owner() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_notification_repository();
        let mine = repo.create_notification(&notification(2, "hello", NotificationKind::General))?;
        repo.create_notification(&notification(2, "job", NotificationKind::JobAlert))?;
        repo.create_notification(&notification(3, "other", NotificationKind::Message))?;

        // Somebody else's id behaves as missing
        assert!(matches!(
            repo.mark_read(mine, UserId(3)),
            Err(HubError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete_for_user(mine, UserId(3)),
            Err(HubError::NotFound { .. })
        ));

        repo.mark_read(mine, UserId(2))?;
        assert!(repo.find_notification_by_id(mine)?.is_read);
        assert_eq!(repo.count_unread(UserId(2))?, 1);
        assert_eq!(repo.mark_all_read(UserId(2))?, 1);
        assert_eq!(repo.count_unread(UserId(2))?, 0);
        assert_eq!(repo.count_unread(UserId(3))?, 1);

        assert_eq!(repo.delete_all_for_user(UserId(2))?, 2);
        assert_eq!(repo.find_notifications_for_user(UserId(3), None)?.len(), 1);
        Ok(())
    }

    #[test]
    fn newest_notification_is_listed_first() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_notification_repository();
        for i in 0..5 {
            repo.create_notification(&notification(
                2,
                &format!("n{i}"),
                NotificationKind::General,
            ))?;
        }
        let latest = repo.find_notifications_for_user(UserId(2), Some(2))?;
        let messages: Vec<&str> = latest.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["n4", "n3"]);
        Ok(())
    }

    #[test]
    fn kind_is_stored_in_type_column() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_notification_repository();
        let id = repo.create_notification(&notification(
            2,
            "Bob wants to connect",
            NotificationKind::ConnectionRequest,
        ))?;
        assert_eq!(
            repo.find_notification_by_id(id)?.kind,
            NotificationKind::ConnectionRequest
        );

        repo.update_notification(
            id,
            &NotificationUpdate {
                kind: Some(NotificationKind::General),
                ..Default::default()
            },
        )?;
        let updated = repo.find_notification_by_id(id)?;
        assert_eq!(updated.kind, NotificationKind::General);
        assert_eq!(updated.message, "Bob wants to connect");
        Ok(())
    }
}
