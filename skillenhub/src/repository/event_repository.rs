use crate::error::HubError;
use crate::models::core::EventId;
use crate::models::event::{Event, EventKind, EventSummary, EventUpdate, NewEvent};

pub trait EventRepository: Send + Sync {
    fn create_event(&self, event: &NewEvent) -> Result<EventId, HubError>;

    fn find_event_by_id(&self, id: EventId) -> Result<Event, HubError>;

    /// Events ordered by date, soonest first, optionally restricted to one kind.
    fn find_events(&self, kind: Option<EventKind>) -> Result<Vec<EventSummary>, HubError>;

    /// The distinct kinds used by stored events.
    fn find_event_kinds(&self) -> Result<Vec<EventKind>, HubError>;

    fn update_event(&self, id: EventId, update: &EventUpdate) -> Result<(), HubError>;

    /// Deletes the event only; registrations referring to it remain.
    fn delete_event(&self, id: EventId) -> Result<(), HubError>;

    fn event_exists(&self, id: EventId) -> Result<bool, HubError>;

    fn count_events(&self) -> Result<i64, HubError>;
}
