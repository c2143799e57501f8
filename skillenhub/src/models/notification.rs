use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::models::core::{NotificationId, UserId};

/// The `type` column of `notifications`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ConnectionRequest,
    Message,
    JobAlert,
    #[default]
    General,
}

impl NotificationKind {
    /// Returns the string representation used in storage and display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ConnectionRequest => "connection_request",
            NotificationKind::Message => "message",
            NotificationKind::JobAlert => "job_alert",
            NotificationKind::General => "general",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connection_request" => Ok(NotificationKind::ConnectionRequest),
            "message" => Ok(NotificationKind::Message),
            "job_alert" => Ok(NotificationKind::JobAlert),
            "general" => Ok(NotificationKind::General),
            _ => Err(HubError::InvalidEnumValue {
                field: "notifications.type",
                value: s.to_string(),
            }),
        }
    }
}

/// A row of the `notifications` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: UserId,
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationUpdate {
    pub message: Option<String>,
    pub kind: Option<NotificationKind>,
    pub is_read: Option<bool>,
}
