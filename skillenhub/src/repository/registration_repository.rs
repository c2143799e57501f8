use chrono::{DateTime, Utc};

use crate::error::HubError;
use crate::models::core::{EventId, RegistrationId, UserId};
use crate::models::event::{Attendee, EventRegistration, NewEventRegistration, RegisteredEvent};

/// Registrations are immutable: they are created and deleted, never updated.
pub trait RegistrationRepository: Send + Sync {
    ///
    /// # Errors
    /// * `HubError::UniqueConstraintViolation` if the user is already registered.
    fn create_registration(
        &self,
        registration: &NewEventRegistration,
    ) -> Result<RegistrationId, HubError>;

    ///
    /// Registers the user unless the event already has `max_participants`
    /// registrations. The count and the insert run as one statement.
    ///
    /// Returns `None` when the event is full. A limit of `None` or `0` means unlimited.
    ///
    /// # Errors
    /// * `HubError::UniqueConstraintViolation` if the user is already registered.
    fn create_registration_within(
        &self,
        registration: &NewEventRegistration,
        max_participants: Option<i64>,
    ) -> Result<Option<RegistrationId>, HubError>;

    fn find_registration_by_id(&self, id: RegistrationId) -> Result<EventRegistration, HubError>;

    fn find_registration(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<Option<EventRegistration>, HubError>;

    /// Most recent registrants of `event_id` first.
    fn find_attendees(&self, event_id: EventId, limit: Option<usize>)
        -> Result<Vec<Attendee>, HubError>;

    ///
    /// Events `user_id` registered for, soonest first.
    ///
    /// # Arguments
    /// * `from` - When given, only events taking place at or after this instant.
    fn find_registered_events(
        &self,
        user_id: UserId,
        from: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<RegisteredEvent>, HubError>;

    fn delete_registration(&self, id: RegistrationId) -> Result<(), HubError>;

    /// Returns whether a registration was removed.
    fn delete_registration_for(&self, user_id: UserId, event_id: EventId)
        -> Result<bool, HubError>;

    /// Returns the number of deleted registrations.
    fn delete_registrations_for_event(&self, event_id: EventId) -> Result<usize, HubError>;

    fn count_registrations(&self) -> Result<i64, HubError>;

    fn count_registrations_for_event(&self, event_id: EventId) -> Result<i64, HubError>;
}
