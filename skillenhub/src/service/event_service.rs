use crate::error::HubError;
use crate::models::core::{EventId, RegistrationId, UserId};
use crate::models::event::{
    Attendee, Event, EventKind, EventSummary, EventUpdate, NewEvent, NewEventRegistration,
    RegisteredEvent,
};
use crate::repository::event_repository::EventRepository;
use crate::repository::registration_repository::RegistrationRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::require_text;
use crate::service::user_service::ensure_user_exists;
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

pub struct EventService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    users: Arc<dyn UserRepository>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
            users,
        }
    }

    pub fn create_event(&self, event: &NewEvent) -> Result<EventId, HubError> {
        require_text(&event.title, "title")?;
        if event.max_participants.is_some_and(|max| max < 0) {
            return Err(HubError::BadInput(
                "max_participants must not be negative".to_string(),
            ));
        }
        if let Some(creator) = event.created_by {
            ensure_user_exists(self.users.as_ref(), creator)?;
        }
        self.events.create_event(event)
    }

    pub fn update_event(&self, id: EventId, update: &EventUpdate) -> Result<(), HubError> {
        self.events.update_event(id, update)
    }

    /// Deletes the event together with its registrations.
    ///
    /// Returns the number of registrations removed.
    pub fn delete_event(&self, id: EventId) -> Result<usize, HubError> {
        if !self.events.event_exists(id)? {
            return Err(HubError::not_found(EventId::ENTITY, id));
        }
        let removed = self.registrations.delete_registrations_for_event(id)?;
        self.events.delete_event(id)?;
        info!("Deleted event {id} and {removed} registrations");
        Ok(removed)
    }

    pub fn event(&self, id: EventId) -> Result<Event, HubError> {
        self.events.find_event_by_id(id)
    }

    pub fn events(&self, kind: Option<EventKind>) -> Result<Vec<EventSummary>, HubError> {
        self.events.find_events(kind)
    }

    pub fn event_kinds(&self) -> Result<Vec<EventKind>, HubError> {
        self.events.find_event_kinds()
    }

    /// Registers the user for the event as of now.
    pub fn register(&self, user_id: UserId, event_id: EventId) -> Result<RegistrationId, HubError> {
        self.register_at(user_id, event_id, Utc::now())
    }

    ///
    /// Registers the user for the event, evaluating the deadline at `now`.
    ///
    /// # Errors
    /// * `HubError::ReferenceNotFound` if the event or the user does not exist.
    /// * `HubError::RegistrationClosed` once the registration deadline has passed.
    /// * `HubError::EventFull` when `max_participants` registrations exist.
    /// * `HubError::UniqueConstraintViolation` if the user is already registered.
    pub fn register_at(
        &self,
        user_id: UserId,
        event_id: EventId,
        now: DateTime<Utc>,
    ) -> Result<RegistrationId, HubError> {
        let event = self.events.find_event_by_id(event_id).map_err(|e| match e {
            HubError::NotFound { entity, id } => HubError::ReferenceNotFound { entity, id },
            other => other,
        })?;
        ensure_user_exists(self.users.as_ref(), user_id)?;

        if !event.accepts_registrations_at(now) {
            return Err(HubError::RegistrationClosed(event_id.value()));
        }
        self.registrations
            .create_registration_within(
                &NewEventRegistration { user_id, event_id },
                event.max_participants,
            )?
            .ok_or(HubError::EventFull(event_id.value()))
    }

    /// Returns whether the user was registered.
    pub fn unregister(&self, user_id: UserId, event_id: EventId) -> Result<bool, HubError> {
        self.registrations.delete_registration_for(user_id, event_id)
    }

    pub fn attendees(&self, event_id: EventId, limit: Option<usize>) -> Result<Vec<Attendee>, HubError> {
        self.registrations.find_attendees(event_id, limit)
    }

    /// Events the user registered for; with `upcoming_only` past events are left out.
    pub fn registrations_of(
        &self,
        user_id: UserId,
        upcoming_only: bool,
    ) -> Result<Vec<RegisteredEvent>, HubError> {
        let from = upcoming_only.then(Utc::now);
        self.registrations.find_registered_events(user_id, from, None)
    }
}
