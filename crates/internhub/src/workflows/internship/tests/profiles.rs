use super::common::*;
use crate::workflows::internship::domain::{ProfileUpdate, Role};
use crate::workflows::internship::service::WorkflowError;

#[test]
fn ensure_profile_defaults_to_student_role() {
    let (service, _, _) = build_service();

    let profile = service
        .ensure_profile(user("user_fresh"), "fresh@example.edu", "Fresh Face")
        .expect("profile created");

    assert_eq!(profile.role, Some(Role::Student));
    assert_eq!(profile.email, "fresh@example.edu");
}

#[test]
fn ensure_profile_is_idempotent() {
    let (service, _, _) = build_service();

    let first = service
        .ensure_profile(user("user_fresh"), "fresh@example.edu", "Fresh Face")
        .expect("profile created");
    let second = service
        .ensure_profile(user("user_fresh"), "other@example.edu", "Other Name")
        .expect("second call returns existing");

    assert_eq!(first, second);
}

#[test]
fn profile_edits_apply_to_owned_fields() {
    let (service, _, _) = build_service();

    let updated = service
        .update_profile(
            &user(STUDENT),
            ProfileUpdate {
                bio: Some("Final-year CS student.".to_string()),
                skills: Some(vec!["rust".to_string(), "postgres".to_string()]),
                ..ProfileUpdate::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(updated.bio.as_deref(), Some("Final-year CS student."));
    assert_eq!(updated.skills.len(), 2);
}

#[test]
fn role_is_write_once() {
    let (service, _, profiles) = build_service();
    profiles.seed(incomplete_profile("user_new"));

    let filled = service
        .update_profile(
            &user("user_new"),
            ProfileUpdate {
                full_name: Some("New User".to_string()),
                role: Some(Role::Mentor),
                ..ProfileUpdate::default()
            },
        )
        .expect("unset role may be filled");
    assert_eq!(filled.role, Some(Role::Mentor));

    match service.update_profile(
        &user("user_new"),
        ProfileUpdate {
            role: Some(Role::Admin),
            ..ProfileUpdate::default()
        },
    ) {
        Err(WorkflowError::InvalidStatus("mentor")) => {}
        other => panic!("expected role change rejection, got {other:?}"),
    }
}

#[test]
fn updating_missing_profile_is_not_found() {
    let (service, _, _) = build_service();

    match service.update_profile(&user("user_ghost"), ProfileUpdate::default()) {
        Err(WorkflowError::NotFound("profile")) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}
