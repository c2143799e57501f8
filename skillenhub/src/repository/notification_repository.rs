use crate::error::HubError;
use crate::models::core::{NotificationId, UserId};
use crate::models::notification::{NewNotification, Notification, NotificationUpdate};

///
/// Storage of the notifications shown to a user.
///
/// The operations scoped by `user_id` only touch rows owned by that user, an id
/// belonging to somebody else behaves as if it did not exist.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationRepository: Send + Sync {
    fn create_notification(&self, notification: &NewNotification)
        -> Result<NotificationId, HubError>;

    fn find_notification_by_id(&self, id: NotificationId) -> Result<Notification, HubError>;

    /// Notifications of `user_id`, newest first.
    fn find_notifications_for_user(
        &self,
        user_id: UserId,
        limit: Option<usize>,
    ) -> Result<Vec<Notification>, HubError>;

    fn update_notification(
        &self,
        id: NotificationId,
        update: &NotificationUpdate,
    ) -> Result<(), HubError>;

    fn delete_notification(&self, id: NotificationId) -> Result<(), HubError>;

    fn mark_read(&self, id: NotificationId, user_id: UserId) -> Result<(), HubError>;

    /// Returns the number of notifications that changed from unread to read.
    fn mark_all_read(&self, user_id: UserId) -> Result<usize, HubError>;

    fn delete_for_user(&self, id: NotificationId, user_id: UserId) -> Result<(), HubError>;

    /// Returns the number of deleted notifications.
    fn delete_all_for_user(&self, user_id: UserId) -> Result<usize, HubError>;

    fn count_unread(&self, user_id: UserId) -> Result<i64, HubError>;
}
