//! Notifications shown to a user: connection requests, new messages, job alerts.
//!
//! Other services hand their notifications to this one, which only stores them.
//! Reading, clearing and counting are scoped to the owning user.
use crate::error::HubError;
use crate::models::core::{NotificationId, UserId};
use crate::models::notification::{NewNotification, Notification, NotificationKind};
use crate::repository::notification_repository::NotificationRepository;
use crate::service::require_text;
use log::debug;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    pub fn notify(
        &self,
        user_id: UserId,
        message: &str,
        kind: NotificationKind,
    ) -> Result<NotificationId, HubError> {
        require_text(message, "notification message")?;
        self.repo.create_notification(&NewNotification {
            user_id,
            message: message.to_string(),
            kind,
        })
    }

    /// Sends the same notification to every user in `user_ids`.
    pub fn notify_many(
        &self,
        user_ids: &[UserId],
        message: &str,
        kind: NotificationKind,
    ) -> Result<Vec<NotificationId>, HubError> {
        debug!("Sending '{message}' to {} users", user_ids.len());
        user_ids
            .iter()
            .map(|user_id| self.notify(*user_id, message, kind))
            .collect()
    }

    pub fn notifications(
        &self,
        user_id: UserId,
        limit: Option<usize>,
    ) -> Result<Vec<Notification>, HubError> {
        self.repo.find_notifications_for_user(user_id, limit)
    }

    pub fn unread_count(&self, user_id: UserId) -> Result<i64, HubError> {
        self.repo.count_unread(user_id)
    }

    pub fn mark_read(&self, id: NotificationId, user_id: UserId) -> Result<(), HubError> {
        self.repo.mark_read(id, user_id)
    }

    pub fn mark_all_read(&self, user_id: UserId) -> Result<usize, HubError> {
        self.repo.mark_all_read(user_id)
    }

    pub fn delete(&self, id: NotificationId, user_id: UserId) -> Result<(), HubError> {
        self.repo.delete_for_user(id, user_id)
    }

    /// Deletes every notification of `user_id`.
    pub fn clear(&self, user_id: UserId) -> Result<usize, HubError> {
        self.repo.delete_all_for_user(user_id)
    }
}
