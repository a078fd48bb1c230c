use crate::infra::{seeded_profile, InMemoryMarketplaceRepository, InMemoryProfileStore};
use clap::Args;
use std::sync::Arc;

use internhub::error::AppError;
use internhub::workflows::internship::{
    ApplicationStatus, DeliverableForm, InternshipForm, MarketplaceService, ProfileStore, Role,
    SubmissionStatus, UserId, WorkflowError,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the weekly progress portion of the demo.
    #[arg(long)]
    pub(crate) skip_progress: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryMarketplaceRepository::default());
    let profiles = Arc::new(InMemoryProfileStore::default());

    let mentor = seeded_profile("user_demo_mentor", Role::Mentor, "Morgan Reyes");
    profiles
        .upsert(mentor.clone())
        .map_err(WorkflowError::from)?;

    let service = MarketplaceService::new(repository, profiles);

    println!("Internship marketplace demo");

    let student = service.ensure_profile(
        UserId("user_demo_student".to_string()),
        "casey@internhub.example",
        "Casey Nguyen",
    )?;
    println!(
        "  signed up {} as {}",
        student.full_name,
        student.role.map(Role::label).unwrap_or("unset")
    );

    let internship = service.post_internship(
        &mentor.id,
        InternshipForm {
            title: "Backend Engineering Intern".to_string(),
            company_name: "InternHub Labs".to_string(),
            description: "Build and ship marketplace features end to end.".to_string(),
            location: Some("Remote".to_string()),
            duration_weeks: Some(12),
            required_skills: vec!["rust".to_string(), "sql".to_string()],
        },
    )?;
    println!(
        "  {} posted '{}' ({})",
        mentor.full_name, internship.title, internship.id.0
    );

    let application =
        service.apply_to_internship(&student.id, &internship.id, Default::default())?;
    println!(
        "  {} applied -> {} [{}]",
        student.full_name,
        application.id.0,
        application.status.label()
    );

    match service.apply_to_internship(&student.id, &internship.id, Default::default()) {
        Err(WorkflowError::DuplicateApplication) => {
            println!("  duplicate application refused, one row kept");
        }
        Ok(_) => println!("  unexpected: duplicate application accepted"),
        Err(err) => return Err(err.into()),
    }

    let accepted =
        service.review_application(&application.id, ApplicationStatus::Accepted, &mentor.id)?;
    println!("  mentor accepted -> [{}]", accepted.status.label());

    if !args.skip_progress {
        let entry = service.log_progress(
            &student.id,
            &application.id,
            1,
            "Bootstrapped the service and wired the first endpoint.".to_string(),
        )?;
        let annotated = service.comment_progress(
            &entry.id,
            "Good pace. Add request tracing next week.".to_string(),
            &mentor.id,
        )?;
        println!(
            "  week {} logged, mentor comment: {}",
            annotated.week_number,
            annotated.mentor_comment.as_deref().unwrap_or("(none)")
        );
    }

    let submission = service.submit_deliverable(
        &student.id,
        &application.id,
        DeliverableForm {
            title: "Final project".to_string(),
            description: "Marketplace feature with tests and docs.".to_string(),
            project_url: None,
            repository_url: Some("https://git.internhub.example/casey/final".to_string()),
        },
    )?;
    println!("  deliverable filed -> {}", submission.id.0);

    service.review_submission(
        &submission.id,
        SubmissionStatus::Approved,
        Some("Meets the bar. Nice work.".to_string()),
        &mentor.id,
    )?;
    println!("  mentor approved the deliverable");

    let issued = service.issue_certificate_if_eligible(&application.id, &student.id)?;
    println!(
        "  certificate {} ('{}'), already existed: {}",
        issued.certificate.id.0, issued.certificate.title, issued.already_existed
    );

    let reissued = service.issue_certificate_if_eligible(&application.id, &student.id)?;
    println!(
        "  reissue returned {} (already existed: {})",
        reissued.certificate.id.0, reissued.already_existed
    );

    Ok(())
}
