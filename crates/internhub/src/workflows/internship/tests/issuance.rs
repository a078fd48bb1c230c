use super::common::*;
use crate::workflows::internship::repository::MarketplaceRepository;
use crate::workflows::internship::domain::{ApplicationId, SubmissionStatus};
use crate::workflows::internship::service::WorkflowError;

#[test]
fn issuance_requires_an_approved_submission() {
    let (service, _, _) = build_service();
    let internship = posted_internship(&service);
    let application = accepted_application(&service, &internship);

    match service.issue_certificate_if_eligible(&application.id, &user(STUDENT)) {
        Err(WorkflowError::SubmissionNotApproved) => {}
        other => panic!("expected submission not approved, got {other:?}"),
    }
}

#[test]
fn issuance_rejects_mismatched_student() {
    let (service, _, _) = build_service();
    let internship = posted_internship(&service);
    let application = accepted_application(&service, &internship);
    let submission = service
        .submit_deliverable(&user(STUDENT), &application.id, deliverable_form())
        .expect("deliverable filed");
    service
        .review_submission(&submission.id, SubmissionStatus::Approved, None, &user(MENTOR))
        .expect("approval");

    match service.issue_certificate_if_eligible(&application.id, &user(SECOND_STUDENT)) {
        Err(WorkflowError::ApplicationMismatch) => {}
        other => panic!("expected application mismatch, got {other:?}"),
    }
}

#[test]
fn reissue_returns_the_same_certificate() {
    let (service, repository, _) = build_service();
    let internship = posted_internship(&service);
    let application = accepted_application(&service, &internship);
    let submission = service
        .submit_deliverable(&user(STUDENT), &application.id, deliverable_form())
        .expect("deliverable filed");
    service
        .review_submission(&submission.id, SubmissionStatus::Approved, None, &user(MENTOR))
        .expect("approval already issued a certificate");

    let first = service
        .issue_certificate_if_eligible(&application.id, &user(STUDENT))
        .expect("issuance succeeds");
    assert!(first.already_existed);

    let second = service
        .issue_certificate_if_eligible(&application.id, &user(STUDENT))
        .expect("reissue succeeds");
    assert!(second.already_existed);
    assert_eq!(first.certificate.id, second.certificate.id);
    assert_eq!(repository.certificate_count(), 1);
}

#[test]
fn first_issue_reports_fresh_certificate() {
    let (service, repository, _) = build_service();
    let internship = posted_internship(&service);
    let application = accepted_application(&service, &internship);
    let submission = service
        .submit_deliverable(&user(STUDENT), &application.id, deliverable_form())
        .expect("deliverable filed");

    // Approve through the repository directly so issuance has not run yet.
    let mut approved = repository
        .fetch_submission(&submission.id)
        .expect("fetch succeeds")
        .expect("record present");
    approved.status = SubmissionStatus::Approved;
    repository
        .update_submission(approved)
        .expect("update succeeds");

    let issued = service
        .issue_certificate_if_eligible(&application.id, &user(STUDENT))
        .expect("issuance succeeds");
    assert!(!issued.already_existed);
    assert_eq!(issued.certificate.application_id, application.id);
    assert_eq!(repository.certificate_count(), 1);
}

#[test]
fn unknown_application_is_not_found() {
    let (service, _, _) = build_service();

    match service.issue_certificate_if_eligible(
        &ApplicationId("app-missing".to_string()),
        &user(STUDENT),
    ) {
        Err(WorkflowError::NotFound("application")) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}
