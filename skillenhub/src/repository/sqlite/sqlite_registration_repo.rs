use crate::error::HubError;
use crate::models::core::{EventId, RegistrationId, UserId};
use crate::models::event::{Attendee, EventRegistration, NewEventRegistration, RegisteredEvent};
use crate::repository::registration_repository::RegistrationRepository;
use crate::repository::sqlite::sqlite_event_repo::{event_from_row, EVENT_COLUMNS};
use crate::repository::sqlite::{count_rows, delete_row, limit_param, timestamp, to_db_time};
use crate::repository::SharedSqliteConnection;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteRegistrationRepository {
    connection: SharedSqliteConnection,
}

impl SqliteRegistrationRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `event_registrations` table.
pub(crate) const CREATE_EVENT_REGISTRATIONS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS event_registrations (
    id integer primary key autoincrement not null,
    user_id integer not null,
    event_id integer not null,
    registered_at datetime not null default current_timestamp,
    UNIQUE(user_id, event_id)
);
CREATE INDEX IF NOT EXISTS idx_event_registrations_event_id ON event_registrations (event_id);
";

fn registration_from_row(row: &Row<'_>) -> rusqlite::Result<EventRegistration> {
    Ok(EventRegistration {
        id: row.get(0)?,
        user_id: row.get(1)?,
        event_id: row.get(2)?,
        registered_at: timestamp(row, 3)?,
    })
}

impl RegistrationRepository for SqliteRegistrationRepository {
    fn create_registration(
        &self,
        registration: &NewEventRegistration,
    ) -> Result<RegistrationId, HubError> {
        debug!(
            "Registering user {} for event {}",
            registration.user_id, registration.event_id
        );
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = conn
            .query_row(
                "INSERT INTO event_registrations (user_id, event_id) VALUES (?1, ?2) RETURNING id",
                params![registration.user_id, registration.event_id],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("event_registrations", e))?;
        Ok(id)
    }

    fn create_registration_within(
        &self,
        registration: &NewEventRegistration,
        max_participants: Option<i64>,
    ) -> Result<Option<RegistrationId>, HubError> {
        debug!(
            "Registering user {} for event {} with limit {max_participants:?}",
            registration.user_id, registration.event_id
        );
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = conn
            .query_row(
                r"INSERT INTO event_registrations (user_id, event_id)
                  SELECT ?1, ?2
                  WHERE ?3 IS NULL OR ?3 <= 0
                     OR (SELECT COUNT(*) FROM event_registrations WHERE event_id = ?2) < ?3
                  RETURNING id",
                params![registration.user_id, registration.event_id, max_participants],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| HubError::from_write("event_registrations", e))?;
        Ok(id)
    }

    fn find_registration_by_id(&self, id: RegistrationId) -> Result<EventRegistration, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        conn.query_row(
            "SELECT id, user_id, event_id, registered_at FROM event_registrations WHERE id = ?1",
            params![id],
            registration_from_row,
        )
        .optional()?
        .ok_or_else(|| HubError::not_found(RegistrationId::ENTITY, id))
    }

    fn find_registration(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<Option<EventRegistration>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let registration = conn
            .query_row(
                r"SELECT id, user_id, event_id, registered_at FROM event_registrations
                  WHERE user_id = ?1 AND event_id = ?2",
                params![user_id, event_id],
                registration_from_row,
            )
            .optional()?;
        Ok(registration)
    }

    fn find_attendees(
        &self,
        event_id: EventId,
        limit: Option<usize>,
    ) -> Result<Vec<Attendee>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            r"SELECT u.id, u.full_name, u.profile_pic, r.registered_at
              FROM event_registrations r
              INNER JOIN users u ON r.user_id = u.id
              WHERE r.event_id = ?1
              ORDER BY r.registered_at DESC, r.id DESC
              LIMIT ?2",
        )?;
        let attendees = stmt
            .query_map(params![event_id, limit_param(limit)], |row| {
                Ok(Attendee {
                    user_id: row.get(0)?,
                    full_name: row.get(1)?,
                    profile_pic: row.get(2)?,
                    registered_at: timestamp(row, 3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(attendees)
    }

    fn find_registered_events(
        &self,
        user_id: UserId,
        from: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<RegisteredEvent>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            r"SELECT {EVENT_COLUMNS}, r.registered_at
              FROM event_registrations r
              INNER JOIN events e ON r.event_id = e.id
              WHERE r.user_id = ?1 AND (?2 IS NULL OR e.event_date >= ?2)
              ORDER BY e.event_date ASC, e.id ASC
              LIMIT ?3"
        );
        let mut stmt = conn.prepare(&sql)?;
        let events = stmt
            .query_map(
                params![user_id, from.as_ref().map(to_db_time), limit_param(limit)],
                |row| {
                    Ok(RegisteredEvent {
                        event: event_from_row(row)?,
                        registered_at: timestamp(row, 10)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn delete_registration(&self, id: RegistrationId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "event_registrations", RegistrationId::ENTITY, id.value())
    }

    fn delete_registration_for(&self, user_id: UserId, event_id: EventId) -> Result<bool, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "DELETE FROM event_registrations WHERE user_id = ?1 AND event_id = ?2",
            params![user_id, event_id],
        )?;
        Ok(rows_affected > 0)
    }

    fn delete_registrations_for_event(&self, event_id: EventId) -> Result<usize, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "DELETE FROM event_registrations WHERE event_id = ?1",
            params![event_id],
        )?;
        debug!("Deleted {rows_affected} registrations for event {event_id}");
        Ok(rows_affected)
    }

    fn count_registrations(&self) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(&conn, "SELECT COUNT(*) FROM event_registrations", &[])
    }

    fn count_registrations_for_event(&self, event_id: EventId) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(
            &conn,
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = ?1",
            &[&event_id],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{EventKind, NewEvent};
    use crate::repository::event_repository::EventRepository;
    use crate::repository::sqlite::tests::{create_test_user, test_database_manager};
    use chrono::Duration;

    #[test]
    fn user_registers_only_once_per_event() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_registration_repository();
        let registration = NewEventRegistration {
            user_id: UserId(2),
            event_id: EventId(1),
        };
        let id = repo.create_registration(&registration)?;
        assert_eq!(repo.find_registration_by_id(id)?.event_id, EventId(1));

        let again = repo.create_registration(&registration);
        assert!(
            matches!(again, Err(HubError::UniqueConstraintViolation { ref table, .. }) if table == "event_registrations")
        );
        assert_eq!(repo.count_registrations_for_event(EventId(1))?, 1);
        Ok(())
    }

    #[test]
    fn registration_within_limit_stops_at_capacity() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_registration_repository();
        let register = |user: i64, limit: Option<i64>| {
            repo.create_registration_within(
                &NewEventRegistration {
                    user_id: UserId(user),
                    event_id: EventId(1),
                },
                limit,
            )
        };

        assert!(register(2, Some(2))?.is_some());
        assert!(register(3, Some(2))?.is_some());
        assert_eq!(register(4, Some(2))?, None);
        assert_eq!(repo.count_registrations_for_event(EventId(1))?, 2);

        // Other events are counted separately
        let elsewhere = repo.create_registration_within(
            &NewEventRegistration {
                user_id: UserId(4),
                event_id: EventId(2),
            },
            Some(1),
        )?;
        assert!(elsewhere.is_some());

        // No limit, or a limit of zero, never fills up
        assert!(register(4, None)?.is_some());
        assert!(register(5, Some(0))?.is_some());
        assert!(matches!(
            register(5, None),
            Err(HubError::UniqueConstraintViolation { .. })
        ));
        Ok(())
    }

    #[test]
    fn registered_events_can_be_limited_to_upcoming() -> Result<(), HubError> {
        let db_manager = test_database_manager()?;
        let user = create_test_user(&db_manager, "attendee@x.com")?;
        let events = db_manager.create_event_repository();
        let now = Utc::now();
        let past = events.create_event(&NewEvent::new(
            "Last month",
            EventKind::Event,
            now - Duration::days(30),
        ))?;
        let next = events.create_event(&NewEvent::new(
            "Next week",
            EventKind::Hackathon,
            now + Duration::days(7),
        ))?;

        let repo = db_manager.create_registration_repository();
        for event_id in [next, past] {
            repo.create_registration(&NewEventRegistration {
                user_id: user,
                event_id,
            })?;
        }

        let all: Vec<EventId> = repo
            .find_registered_events(user, None, None)?
            .into_iter()
            .map(|r| r.event.id)
            .collect();
        assert_eq!(all, vec![past, next]);

        let upcoming = repo.find_registered_events(user, Some(now), Some(5))?;
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].event.title, "Next week");

        let attendees = repo.find_attendees(next, None)?;
        assert_eq!(attendees.len(), 1);
        assert_eq!(attendees[0].full_name, "Test User attendee@x.com");
        Ok(())
    }

    #[test]
    fn registrations_are_removed_by_pair_or_event() -> Result<(), HubError> {
        let repo = test_database_manager()?.create_registration_repository();
        for user in [2, 3, 4] {
            repo.create_registration(&NewEventRegistration {
                user_id: UserId(user),
                event_id: EventId(9),
            })?;
        }
        assert!(repo.delete_registration_for(UserId(2), EventId(9))?);
        assert!(!repo.delete_registration_for(UserId(2), EventId(9))?);
        assert_eq!(repo.delete_registrations_for_event(EventId(9))?, 2);
        assert_eq!(repo.count_registrations()?, 0);
        Ok(())
    }
}
