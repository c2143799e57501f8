use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::models::core::{EventId, RegistrationId, UserId};

/// The `type` column of `events`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    #[default]
    Event,
    Competition,
    Hackathon,
}

impl EventKind {
    /// Returns the string representation used in storage and display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Event => "event",
            EventKind::Competition => "competition",
            EventKind::Hackathon => "hackathon",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(EventKind::Event),
            "competition" => Ok(EventKind::Competition),
            "hackathon" => Ok(EventKind::Hackathon),
            _ => Err(HubError::InvalidEnumValue {
                field: "events.type",
                value: s.to_string(),
            }),
        }
    }
}

/// A row of the `events` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub kind: EventKind,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_participants: Option<i64>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Registration is open until the deadline, if there is one
    #[must_use]
    pub fn accepts_registrations_at(&self, now: DateTime<Utc>) -> bool {
        self.registration_deadline
            .map_or(true, |deadline| now <= deadline)
    }

    /// Whether `registered` participants fill the event
    #[must_use]
    pub fn is_full(&self, registered: i64) -> bool {
        self.max_participants
            .is_some_and(|max| max > 0 && registered >= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub kind: EventKind,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_participants: Option<i64>,
    pub created_by: Option<UserId>,
}

impl NewEvent {
    #[must_use]
    pub fn new(title: &str, kind: EventKind, event_date: DateTime<Utc>) -> Self {
        NewEvent {
            title: title.to_string(),
            kind,
            description: None,
            event_date,
            registration_deadline: None,
            location: None,
            max_participants: None,
            created_by: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub kind: Option<EventKind>,
    pub description: Option<Option<String>>,
    pub event_date: Option<DateTime<Utc>>,
    pub registration_deadline: Option<Option<DateTime<Utc>>>,
    pub location: Option<Option<String>>,
    pub max_participants: Option<Option<i64>>,
    pub created_by: Option<Option<UserId>>,
}

/// An event together with the number of registered participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event: Event,
    pub registration_count: i64,
}

/// A row of the `event_registrations` table. At most one exists per (user, event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: RegistrationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEventRegistration {
    pub user_id: UserId,
    pub event_id: EventId,
}

/// A registered participant of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub user_id: UserId,
    pub full_name: String,
    pub profile_pic: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// An event a user registered for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredEvent {
    pub event: Event,
    pub registered_at: DateTime<Utc>,
}
