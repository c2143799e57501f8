use crate::error::HubError;
use crate::models::core::EventId;
use crate::models::event::{Event, EventKind, EventSummary, EventUpdate, NewEvent};
use crate::repository::event_repository::EventRepository;
use crate::repository::sqlite::{
    count_rows, delete_row, enum_column, opt_timestamp, row_exists, timestamp, to_db_time,
    PartialUpdate,
};
use crate::repository::SharedSqliteConnection;
use log::{debug, info};
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteEventRepository {
    connection: SharedSqliteConnection,
}

impl SqliteEventRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `events` table.
pub(crate) const CREATE_EVENTS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS events (
    id integer primary key autoincrement not null,
    title varchar(255) not null,
    type varchar(16) not null default 'event'
        check (type in ('event', 'competition', 'hackathon')),
    description text,
    event_date datetime not null,
    registration_deadline datetime,
    location varchar(255),
    max_participants integer,
    created_by integer,
    created_at datetime not null default current_timestamp
);
";

pub(crate) const EVENT_COLUMNS: &str = "e.id, e.title, e.type, e.description, e.event_date, \
     e.registration_deadline, e.location, e.max_participants, e.created_by, e.created_at";

/// Maps the ten columns of [`EVENT_COLUMNS`], also used by the registration queries.
pub(crate) fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        kind: enum_column(row, 2)?,
        description: row.get(3)?,
        event_date: timestamp(row, 4)?,
        registration_deadline: opt_timestamp(row, 5)?,
        location: row.get(6)?,
        max_participants: row.get(7)?,
        created_by: row.get(8)?,
        created_at: timestamp(row, 9)?,
    })
}

impl EventRepository for SqliteEventRepository {
    fn create_event(&self, event: &NewEvent) -> Result<EventId, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id: EventId = conn
            .query_row(
                r"INSERT INTO events
                      (title, type, description, event_date, registration_deadline, location, max_participants, created_by)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                  RETURNING id",
                params![
                    event.title,
                    event.kind.as_str(),
                    event.description,
                    to_db_time(&event.event_date),
                    event.registration_deadline.as_ref().map(to_db_time),
                    event.location,
                    event.max_participants,
                    event.created_by,
                ],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("events", e))?;
        info!(
            "Created {} '{}' on {} with id {id}",
            event.kind, event.title, event.event_date
        );
        Ok(id)
    }

    fn find_event_by_id(&self, id: EventId) -> Result<Event, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = ?1");
        conn.query_row(&sql, params![id], event_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(EventId::ENTITY, id))
    }

    fn find_events(&self, kind: Option<EventKind>) -> Result<Vec<EventSummary>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            r"SELECT {EVENT_COLUMNS},
                  (SELECT COUNT(*) FROM event_registrations r WHERE r.event_id = e.id)
              FROM events e
              WHERE ?1 IS NULL OR e.type = ?1
              ORDER BY e.event_date ASC, e.id ASC"
        );
        debug!("find_events():- {sql}");
        let mut stmt = conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![kind.map(|k| k.as_str())], |row| {
                Ok(EventSummary {
                    event: event_from_row(row)?,
                    registration_count: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn find_event_kinds(&self) -> Result<Vec<EventKind>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let mut stmt = conn.prepare("SELECT DISTINCT type FROM events ORDER BY type")?;
        let kinds = stmt
            .query_map([], |row| enum_column(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(kinds)
    }

    fn update_event(&self, id: EventId, update: &EventUpdate) -> Result<(), HubError> {
        let mut partial = PartialUpdate::new("events", EventId::ENTITY);
        partial
            .set("title", update.title.clone())
            .set("type", update.kind.map(|k| k.as_str()))
            .set("description", update.description.clone())
            .set("event_date", update.event_date.as_ref().map(to_db_time))
            .set(
                "registration_deadline",
                update
                    .registration_deadline
                    .map(|deadline| deadline.as_ref().map(to_db_time)),
            )
            .set("location", update.location.clone())
            .set("max_participants", update.max_participants)
            .set("created_by", update.created_by);
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn delete_event(&self, id: EventId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "events", EventId::ENTITY, id.value())
    }

    fn event_exists(&self, id: EventId) -> Result<bool, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        row_exists(&conn, "events", id.value())
    }

    fn count_events(&self) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(&conn, "SELECT COUNT(*) FROM events", &[])
    }
}
