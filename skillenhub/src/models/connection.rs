use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::models::core::{ConnectionId, UserId};

/// Status of a connection request.
///
/// `Pending` is the initial state; `Accepted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    /// Returns the string representation used in storage and display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConnectionStatus::Pending)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            "rejected" => Ok(ConnectionStatus::Rejected),
            _ => Err(HubError::InvalidEnumValue {
                field: "connections.status",
                value: s.to_string(),
            }),
        }
    }
}

/// A row of the `connections` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    /// The participant that is not `user_id`
    #[must_use]
    pub fn other_party(&self, user_id: UserId) -> UserId {
        if self.sender_id == user_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }

    #[must_use]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConnection {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    /// `None` lets the column default (`pending`) apply
    pub status: Option<ConnectionStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionUpdate {
    pub status: Option<ConnectionStatus>,
}

/// An accepted connection seen from one of its participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPeer {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub full_name: String,
    pub profile_pic: Option<String>,
    pub bio: Option<String>,
    pub connected_since: DateTime<Utc>,
}

/// A pending request addressed to the viewing user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingRequest {
    pub connection_id: ConnectionId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_pic: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_literal() {
        for status in [
            ConnectionStatus::Pending,
            ConnectionStatus::Accepted,
            ConnectionStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ConnectionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("blocked".parse::<ConnectionStatus>().is_err());
        assert!("".parse::<ConnectionStatus>().is_err());
    }

    #[test]
    fn other_party_resolves_either_side() {
        let connection = Connection {
            id: ConnectionId(1),
            sender_id: UserId(10),
            receiver_id: UserId(20),
            status: ConnectionStatus::Accepted,
            created_at: Utc::now(),
        };
        assert_eq!(connection.other_party(UserId(10)), UserId(20));
        assert_eq!(connection.other_party(UserId(20)), UserId(10));
        assert!(!connection.involves(UserId(30)));
    }
}
