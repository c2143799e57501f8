use chrono::{DateTime, Utc};
use skillenhub::error::HubError;
use skillenhub::models::core::UserId;
use skillenhub::models::event::{EventKind, NewEvent};
use skillenhub::models::opportunity::{JobType, NewOpportunity};
use skillenhub::models::user::NewUser;
use skillenhub::HubRuntime;

/// Hash of the password "secret", as stored by the web application
pub const TEST_PASSWORD_HASH: &str = "$2y$10$e0MYzXyjpJS7Pd0RVvHwHe1HlCS4bZJ18JuywdEMLT83E1KDmUhCy";

pub fn register_student(runtime: &HubRuntime, name: &str, email: &str) -> Result<UserId, HubError> {
    runtime
        .user_service
        .register(&NewUser::new(name, email, TEST_PASSWORD_HASH))
}

pub fn create_test_opportunity(title: &str) -> NewOpportunity {
    let mut opportunity = NewOpportunity::new(
        title,
        "Acme Robotics",
        JobType::Internship,
        "Help us build warehouse robots",
    );
    opportunity.location = Some("Remote".to_string());
    opportunity.salary_range = Some("10-15k".to_string());
    opportunity
}

pub fn create_test_event(
    title: &str,
    event_date: DateTime<Utc>,
    max_participants: Option<i64>,
) -> NewEvent {
    let mut event = NewEvent::new(title, EventKind::Hackathon, event_date);
    event.location = Some("Main hall".to_string());
    event.max_participants = max_participants;
    event
}
