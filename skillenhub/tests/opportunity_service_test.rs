#[allow(dead_code)]
mod test_helpers;

use crate::test_helpers::common::create_test_runtime;
use crate::test_helpers::fixtures::{create_test_opportunity, register_student};
use skillenhub::error::HubError;
use skillenhub::models::application::{ApplicationStatus, NewApplication};
use skillenhub::models::core::{OpportunityId, UserId};
use skillenhub::models::notification::NotificationKind;
use skillenhub::models::post::NewPost;

fn application(user_id: UserId, opportunity_id: OpportunityId) -> NewApplication {
    NewApplication {
        user_id,
        opportunity_id,
        resume_file: Some("resume.pdf".to_string()),
        status: None,
    }
}

#[test]
fn test_apply_sends_job_alert() -> Result<(), HubError> {
    let runtime = create_test_runtime()?;
    let student = register_student(&runtime, "Student", "student@x.com")?;
    let opportunity = runtime
        .opportunity_service
        .post_opportunity(&create_test_opportunity("Rust intern"))?;

    runtime
        .opportunity_service
        .apply(&application(student, opportunity))?;

    let notes = runtime.notification_service.notifications(student, None)?;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::JobAlert);
    assert!(notes[0].message.contains("Rust intern"));
    assert_eq!(runtime.notification_service.unread_count(student)?, 1);

    let mine = runtime.opportunity_service.applications_of(student)?;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].application.status, ApplicationStatus::Applied);
    assert_eq!(mine[0].company, "Acme Robotics");
    Ok(())
}

#[test]
fn test_apply_to_missing_opportunity() -> Result<(), HubError> {
    let runtime = create_test_runtime()?;
    let student = register_student(&runtime, "Student", "student@x.com")?;
    assert!(matches!(
        runtime
            .opportunity_service
            .apply(&application(student, OpportunityId(31))),
        Err(HubError::ReferenceNotFound { entity: "opportunity", .. })
    ));
    Ok(())
}

#[test]
fn test_status_changes_and_withdrawal() -> Result<(), HubError> {
    let runtime = create_test_runtime()?;
    let student = register_student(&runtime, "Student", "student@x.com")?;
    let other = register_student(&runtime, "Other", "other@x.com")?;
    let opportunity = runtime
        .opportunity_service
        .post_opportunity(&create_test_opportunity("Backend intern"))?;
    let id = runtime
        .opportunity_service
        .apply(&application(student, opportunity))?;

    runtime
        .opportunity_service
        .set_status(id, ApplicationStatus::Shortlisted)?;
    let all = runtime.opportunity_service.all_applications(None)?;
    assert_eq!(all[0].application.status, ApplicationStatus::Shortlisted);
    assert_eq!(all[0].applicant_email, "student@x.com");

    // Someone else cannot withdraw it
    assert!(runtime.opportunity_service.withdraw(id, other).is_err());
    runtime.opportunity_service.withdraw(id, student)?;
    assert!(runtime.opportunity_service.applications_of(student)?.is_empty());
    Ok(())
}

#[test]
fn test_deleting_opportunity_removes_applications() -> Result<(), HubError> {
    let runtime = create_test_runtime()?;
    let first = register_student(&runtime, "First", "first@x.com")?;
    let second = register_student(&runtime, "Second", "second@x.com")?;
    let service = &runtime.opportunity_service;
    let opportunity = service.post_opportunity(&create_test_opportunity("Closing soon"))?;
    service.apply(&application(first, opportunity))?;
    service.apply(&application(second, opportunity))?;
    assert_eq!(service.opportunities()?[0].application_count, 2);

    assert_eq!(service.delete_opportunity(opportunity)?, 2);
    assert!(service.all_applications(None)?.is_empty());
    assert!(matches!(
        service.opportunity(opportunity),
        Err(HubError::NotFound { .. })
    ));
    Ok(())
}

#[test]
fn test_platform_stats_and_dashboard() -> Result<(), HubError> {
    let runtime = create_test_runtime()?;
    let before = runtime.stats_service.platform_stats()?;
    // The seed user is present
    assert_eq!(before.users, 1);

    let alice = register_student(&runtime, "Alice", "alice@x.com")?;
    let bob = register_student(&runtime, "Bob", "bob@x.com")?;
    let opportunity = runtime
        .opportunity_service
        .post_opportunity(&create_test_opportunity("Data intern"))?;
    runtime
        .opportunity_service
        .apply(&application(alice, opportunity))?;
    runtime
        .feed_service
        .create_post(&NewPost::new(alice, "Looking for teammates"))?;
    runtime.connection_service.send_request(bob, alice)?;

    let stats = runtime.stats_service.platform_stats()?;
    assert_eq!(stats.users, 3);
    assert_eq!(stats.opportunities, 1);
    assert_eq!(stats.applications, 1);
    assert_eq!(stats.posts, 1);
    assert_eq!(stats.connections, 0);

    let dashboard = runtime.stats_service.dashboard(alice)?;
    assert_eq!(dashboard.pending_requests, 1);
    // Job alert plus connection request
    assert_eq!(dashboard.unread_notifications, 2);
    assert_eq!(dashboard.posts, 1);
    assert_eq!(dashboard.connections, 0);
    assert_eq!(dashboard.unread_messages, 0);
    Ok(())
}
