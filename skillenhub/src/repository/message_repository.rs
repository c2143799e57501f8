use crate::error::HubError;
use crate::models::core::{MessageId, UserId};
use crate::models::message::{Message, MessageUpdate, NewMessage};

pub trait MessageRepository: Send + Sync {
    fn create_message(&self, message: &NewMessage) -> Result<MessageId, HubError>;

    fn find_message_by_id(&self, id: MessageId) -> Result<Message, HubError>;

    /// All messages exchanged between the two users, oldest first.
    fn find_conversation(&self, first: UserId, second: UserId) -> Result<Vec<Message>, HubError>;

    fn find_last_message(&self, first: UserId, second: UserId)
        -> Result<Option<Message>, HubError>;

    fn update_message(&self, id: MessageId, update: &MessageUpdate) -> Result<(), HubError>;

    fn delete_message(&self, id: MessageId) -> Result<(), HubError>;

    /// Marks every message from `sender` to `receiver` as read, returns the number of rows changed.
    fn mark_conversation_read(&self, receiver: UserId, sender: UserId) -> Result<usize, HubError>;

    fn count_unread_for(&self, receiver: UserId) -> Result<i64, HubError>;
}
