#[allow(dead_code)]
mod test_helpers;

use crate::test_helpers::common::create_test_runtime;
use crate::test_helpers::fixtures::{
    create_test_event, create_test_opportunity, register_student,
};
use chrono::{Duration, Utc};
use skillenhub::error::HubError;
use skillenhub::models::application::NewApplication;
use skillenhub::models::post::NewPost;

#[test]
fn test_same_email_cannot_register_twice() -> Result<(), HubError> {
    let runtime = create_test_runtime()?;
    register_student(&runtime, "Ada", "a@x.com")?;

    let again = register_student(&runtime, "Another Ada", "a@x.com");
    assert!(
        matches!(again, Err(HubError::UniqueConstraintViolation { .. })),
        "expected duplicate e-mail to be rejected, got {again:?}"
    );

    let shouting = register_student(&runtime, "Loud Ada", "A@X.COM");
    assert!(matches!(
        shouting,
        Err(HubError::UniqueConstraintViolation { .. })
    ));
    Ok(())
}

#[test]
fn test_like_twice_unlikes() -> Result<(), HubError> {
    let runtime = create_test_runtime()?;
    let author = register_student(&runtime, "Author", "author@x.com")?;
    let fan = register_student(&runtime, "Fan", "fan@x.com")?;
    let post = runtime
        .feed_service
        .create_post(&NewPost::new(author, "My portfolio is live"))?;

    assert!(runtime.feed_service.toggle_like(fan, post)?);
    assert_eq!(runtime.feed_service.like_count(post)?, 1);

    // A second like from the same user removes the first one
    assert!(!runtime.feed_service.toggle_like(fan, post)?);
    assert_eq!(runtime.feed_service.like_count(post)?, 0);
    Ok(())
}

#[test]
fn test_apply_twice_to_same_opportunity() -> Result<(), HubError> {
    let runtime = create_test_runtime()?;
    let student = register_student(&runtime, "Student", "student@x.com")?;
    let opportunity = runtime
        .opportunity_service
        .post_opportunity(&create_test_opportunity("Robotics intern"))?;
    let application = NewApplication {
        user_id: student,
        opportunity_id: opportunity,
        resume_file: Some("uploads/resume.pdf".to_string()),
        status: None,
    };

    runtime.opportunity_service.apply(&application)?;
    let again = runtime.opportunity_service.apply(&application);
    assert!(matches!(
        again,
        Err(HubError::UniqueConstraintViolation { ref table, .. }) if table == "applications"
    ));
    assert_eq!(runtime.opportunity_service.applications_of(student)?.len(), 1);
    Ok(())
}

#[test]
fn test_register_twice_for_same_event() -> Result<(), HubError> {
    let runtime = create_test_runtime()?;
    let student = register_student(&runtime, "Student", "student@x.com")?;
    let event = runtime.event_service.create_event(&create_test_event(
        "Spring hackathon",
        Utc::now() + Duration::days(14),
        None,
    ))?;

    runtime.event_service.register(student, event)?;
    let again = runtime.event_service.register(student, event);
    assert!(matches!(
        again,
        Err(HubError::UniqueConstraintViolation { .. })
    ));
    assert_eq!(runtime.event_service.attendees(event, None)?.len(), 1);
    Ok(())
}
