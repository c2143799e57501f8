use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::core::{MessageId, UserId};

/// A row of the `messages` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUpdate {
    pub is_read: Option<bool>,
}
