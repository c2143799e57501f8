use crate::error::HubError;
use crate::models::core::UserId;
use crate::repository::application_repository::ApplicationRepository;
use crate::repository::connection_repository::ConnectionRepository;
use crate::repository::event_repository::EventRepository;
use crate::repository::message_repository::MessageRepository;
use crate::repository::notification_repository::NotificationRepository;
use crate::repository::opportunity_repository::OpportunityRepository;
use crate::repository::post_repository::PostRepository;
use crate::repository::registration_repository::RegistrationRepository;
use crate::repository::user_repository::UserRepository;
use serde::Serialize;
use std::sync::Arc;

/// Counts shown on the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub users: i64,
    pub opportunities: i64,
    pub applications: i64,
    pub events: i64,
    pub registrations: i64,
    pub posts: i64,
    pub connections: i64,
}

/// Counts shown on a user's own dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserDashboard {
    pub unread_notifications: i64,
    pub pending_requests: i64,
    pub unread_messages: i64,
    pub connections: i64,
    pub posts: i64,
}

pub struct StatsService {
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) opportunities: Arc<dyn OpportunityRepository>,
    pub(crate) applications: Arc<dyn ApplicationRepository>,
    pub(crate) events: Arc<dyn EventRepository>,
    pub(crate) registrations: Arc<dyn RegistrationRepository>,
    pub(crate) posts: Arc<dyn PostRepository>,
    pub(crate) connections: Arc<dyn ConnectionRepository>,
    pub(crate) messages: Arc<dyn MessageRepository>,
    pub(crate) notifications: Arc<dyn NotificationRepository>,
}

impl StatsService {
    pub fn platform_stats(&self) -> Result<PlatformStats, HubError> {
        Ok(PlatformStats {
            users: self.users.count_users()?,
            opportunities: self.opportunities.count_opportunities()?,
            applications: self.applications.count_applications()?,
            events: self.events.count_events()?,
            registrations: self.registrations.count_registrations()?,
            posts: self.posts.count_posts()?,
            connections: self.connections.count_accepted(None)?,
        })
    }

    pub fn dashboard(&self, user_id: UserId) -> Result<UserDashboard, HubError> {
        Ok(UserDashboard {
            unread_notifications: self.notifications.count_unread(user_id)?,
            pending_requests: self.connections.count_incoming_pending(user_id)?,
            unread_messages: self.messages.count_unread_for(user_id)?,
            connections: self.connections.count_accepted(Some(user_id))?,
            posts: self.posts.count_posts_by_user(user_id)?,
        })
    }
}
