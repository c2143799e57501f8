use crate::error::HubError;
use crate::models::core::{MessageId, UserId};
use crate::models::message::{Message, NewMessage};
use crate::models::notification::NotificationKind;
use crate::repository::message_repository::MessageRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::connection_service::ConnectionService;
use crate::service::notification_service::NotificationService;
use crate::service::require_text;
use std::sync::Arc;

/// Direct messages between accepted connections
pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
    connections: Arc<ConnectionService>,
    notifications: Arc<NotificationService>,
}

impl MessageService {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserRepository>,
        connections: Arc<ConnectionService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            messages,
            users,
            connections,
            notifications,
        }
    }

    ///
    /// Sends a message and notifies the receiver.
    ///
    /// # Errors
    /// * `HubError::BadInput` for a blank message or a message to oneself.
    /// * `HubError::NotConnected` unless the two users are accepted connections.
    pub fn send(&self, message: &NewMessage) -> Result<MessageId, HubError> {
        require_text(&message.message, "message")?;
        if message.sender_id == message.receiver_id {
            return Err(HubError::BadInput(
                "A user cannot send a message to themselves".to_string(),
            ));
        }
        if !self
            .connections
            .are_connected(message.sender_id, message.receiver_id)?
        {
            return Err(HubError::NotConnected(
                message.sender_id.value(),
                message.receiver_id.value(),
            ));
        }

        let id = self.messages.create_message(&NewMessage {
            message: message.message.trim().to_string(),
            ..message.clone()
        })?;
        let sender_name = self.users.find_user_by_id(message.sender_id)?.full_name;
        self.notifications.notify(
            message.receiver_id,
            &format!("New message from {sender_name}"),
            NotificationKind::Message,
        )?;
        Ok(id)
    }

    /// The conversation between the two users, oldest message first.
    pub fn conversation(&self, user_id: UserId, peer: UserId) -> Result<Vec<Message>, HubError> {
        self.messages.find_conversation(user_id, peer)
    }

    /// Opens the conversation as `user_id`, marking the messages from `peer` as read.
    pub fn open_conversation(
        &self,
        user_id: UserId,
        peer: UserId,
    ) -> Result<Vec<Message>, HubError> {
        self.messages.mark_conversation_read(user_id, peer)?;
        self.messages.find_conversation(user_id, peer)
    }

    pub fn last_message(&self, user_id: UserId, peer: UserId) -> Result<Option<Message>, HubError> {
        self.messages.find_last_message(user_id, peer)
    }

    pub fn mark_read(&self, user_id: UserId, peer: UserId) -> Result<usize, HubError> {
        self.messages.mark_conversation_read(user_id, peer)
    }

    pub fn unread_count(&self, user_id: UserId) -> Result<i64, HubError> {
        self.messages.count_unread_for(user_id)
    }
}
