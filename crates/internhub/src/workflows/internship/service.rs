use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::access::{require_owner, AccessGuard, AccessViolation};
use super::domain::{
    Application, ApplicationForm, ApplicationId, ApplicationStatus, DeliverableForm, Internship,
    InternshipForm, InternshipId, InternshipStatus, Profile, ProfileUpdate, ProgressEntry,
    ProgressEntryId, ProgressStatus, Role, Submission, SubmissionId, SubmissionStatus, UserId,
};
use super::issuance::{CertificateIssuer, IssuedCertificate};
use super::repository::{
    ApplicationStatusView, MarketplaceRepository, ProfileStore, RepositoryError,
};

/// Typed outcomes of the workflow operations. Every variant is an expected
/// consequence of ordinary usage (wrong role, wrong state, duplicate
/// request); none triggers an automatic retry.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AccessViolation),
    #[error("invalid transition from '{from}' to '{to}'")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("'{0}' is not a valid target status for this operation")]
    InvalidStatus(&'static str),
    #[error("student already applied to this internship")]
    DuplicateApplication,
    #[error("internship is not open for applications")]
    InternshipUnavailable,
    #[error("application must be accepted before deliverables can be filed")]
    ApplicationNotAccepted,
    #[error("student does not match the application")]
    ApplicationMismatch,
    #[error("certificate requires at least one approved submission")]
    SubmissionNotApproved,
    #[error("referenced {0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static INTERNSHIP_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PROGRESS_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_internship_id() -> InternshipId {
    let id = INTERNSHIP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InternshipId(format!("int-{id:06}"))
}

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

fn next_progress_id() -> ProgressEntryId {
    let id = PROGRESS_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProgressEntryId(format!("prg-{id:06}"))
}

/// Facade composing the access guard, repository, and certificate issuer.
///
/// Each method is one logical unit of work: authorization is re-resolved
/// from the profile store inside the call, and uniqueness hazards are left
/// to the repository's insert contracts rather than read-then-write checks.
pub struct MarketplaceService<R, P> {
    guard: AccessGuard<P>,
    repository: Arc<R>,
    issuer: CertificateIssuer<R>,
}

impl<R, P> MarketplaceService<R, P>
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    pub fn new(repository: Arc<R>, profiles: Arc<P>) -> Self {
        let guard = AccessGuard::new(profiles);
        let issuer = CertificateIssuer::new(repository.clone());
        Self {
            guard,
            repository,
            issuer,
        }
    }

    /// Create the profile row on first sign-in, defaulting the role to
    /// student the way the identity-provider webhook does. Idempotent.
    pub fn ensure_profile(
        &self,
        user_id: UserId,
        email: &str,
        full_name: &str,
    ) -> Result<Profile, WorkflowError> {
        if let Some(existing) = self.guard.profiles().fetch(&user_id)? {
            return Ok(existing);
        }

        let profile = Profile {
            id: user_id,
            email: email.to_string(),
            full_name: full_name.to_string(),
            role: Some(Role::Student),
            bio: None,
            location: None,
            skills: Vec::new(),
            created_at: Utc::now(),
        };
        Ok(self.guard.profiles().upsert(profile)?)
    }

    /// Apply edits from the owning user. The role field is write-once: it may
    /// be filled in while unset but never changed afterwards, since issued
    /// authorizations depend on it.
    pub fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, WorkflowError> {
        let mut profile = self
            .guard
            .profiles()
            .fetch(user_id)?
            .ok_or(WorkflowError::NotFound("profile"))?;

        if let Some(role) = update.role {
            match profile.role {
                None => profile.role = Some(role),
                Some(current) if current == role => {}
                Some(current) => {
                    return Err(WorkflowError::InvalidStatus(current.label()));
                }
            }
        }
        if let Some(full_name) = update.full_name {
            profile.full_name = full_name;
        }
        if let Some(bio) = update.bio {
            profile.bio = Some(bio);
        }
        if let Some(location) = update.location {
            profile.location = Some(location);
        }
        if let Some(skills) = update.skills {
            profile.skills = skills;
        }

        Ok(self.guard.profiles().upsert(profile)?)
    }

    /// Post a new internship listing owned by the calling mentor.
    pub fn post_internship(
        &self,
        mentor_id: &UserId,
        form: InternshipForm,
    ) -> Result<Internship, WorkflowError> {
        let mentor = self.guard.resolve_mentor(mentor_id)?;

        let internship = Internship {
            id: next_internship_id(),
            mentor_id: mentor.id,
            title: form.title,
            company_name: form.company_name,
            description: form.description,
            location: form.location,
            duration_weeks: form.duration_weeks,
            required_skills: form.required_skills,
            status: InternshipStatus::Open,
            created_at: Utc::now(),
        };

        Ok(self.repository.insert_internship(internship)?)
    }

    /// Close or fill a listing. Owning mentor or admin only; `open` is not a
    /// valid target here, a listing never reopens through this path.
    pub fn close_internship(
        &self,
        internship_id: &InternshipId,
        actor_id: &UserId,
        new_status: InternshipStatus,
    ) -> Result<Internship, WorkflowError> {
        if new_status.accepts_applications() {
            return Err(WorkflowError::InvalidStatus(new_status.label()));
        }

        let mut internship = self
            .repository
            .fetch_internship(internship_id)?
            .ok_or(WorkflowError::NotFound("internship"))?;

        self.guard
            .resolve_reviewer(actor_id, &internship.mentor_id, "internship")?;

        internship.status = new_status;
        self.repository.update_internship(internship.clone())?;
        Ok(internship)
    }

    /// Create a pending application for the calling student.
    ///
    /// The duplicate check is the repository's uniqueness constraint on
    /// `(student_id, internship_id)`; a conflict surfaces as
    /// [`WorkflowError::DuplicateApplication`] even under concurrent calls.
    pub fn apply_to_internship(
        &self,
        student_id: &UserId,
        internship_id: &InternshipId,
        form: ApplicationForm,
    ) -> Result<Application, WorkflowError> {
        let student = self.guard.resolve_student(student_id)?;

        let internship = self
            .repository
            .fetch_internship(internship_id)?
            .ok_or(WorkflowError::NotFound("internship"))?;
        if !internship.status.accepts_applications() {
            return Err(WorkflowError::InternshipUnavailable);
        }

        let application = Application {
            id: next_application_id(),
            internship_id: internship.id,
            student_id: student.id,
            status: ApplicationStatus::Pending,
            cover_letter: form.cover_letter,
            resume_url: form.resume_url,
            submitted_at: Utc::now(),
            reviewed_at: None,
        };

        match self.repository.insert_application(application) {
            Ok(application) => Ok(application),
            Err(RepositoryError::Conflict) => Err(WorkflowError::DuplicateApplication),
            Err(err) => Err(err.into()),
        }
    }

    /// Move a pending application to accepted or rejected. Only the mentor
    /// owning the referenced internship, or an admin, may review; terminal
    /// states are sticky.
    pub fn review_application(
        &self,
        application_id: &ApplicationId,
        new_status: ApplicationStatus,
        actor_id: &UserId,
    ) -> Result<Application, WorkflowError> {
        if !new_status.is_review_outcome() {
            return Err(WorkflowError::InvalidStatus(new_status.label()));
        }

        let mut application = self
            .repository
            .fetch_application(application_id)?
            .ok_or(WorkflowError::NotFound("application"))?;

        let internship = self
            .repository
            .fetch_internship(&application.internship_id)?
            .ok_or(WorkflowError::NotFound("internship"))?;

        self.guard
            .resolve_reviewer(actor_id, &internship.mentor_id, "internship")?;

        if !application.status.can_become(new_status) {
            return Err(WorkflowError::InvalidTransition {
                from: application.status.label(),
                to: new_status.label(),
            });
        }

        application.status = new_status;
        if application.reviewed_at.is_none() {
            application.reviewed_at = Some(Utc::now());
        }
        self.repository.update_application(application.clone())?;
        Ok(application)
    }

    /// Student-initiated withdrawal, legal from pending or accepted.
    pub fn withdraw_application(
        &self,
        application_id: &ApplicationId,
        student_id: &UserId,
    ) -> Result<Application, WorkflowError> {
        let student = self.guard.resolve_student(student_id)?;

        let mut application = self
            .repository
            .fetch_application(application_id)?
            .ok_or(WorkflowError::NotFound("application"))?;

        require_owner(&student, &application.student_id, "application")?;

        if !application
            .status
            .can_become(ApplicationStatus::Withdrawn)
        {
            return Err(WorkflowError::InvalidTransition {
                from: application.status.label(),
                to: ApplicationStatus::Withdrawn.label(),
            });
        }

        application.status = ApplicationStatus::Withdrawn;
        if application.reviewed_at.is_none() {
            application.reviewed_at = Some(Utc::now());
        }
        self.repository.update_application(application.clone())?;
        Ok(application)
    }

    /// Externally visible status snapshot for an application.
    pub fn application_status(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationStatusView, WorkflowError> {
        let application = self
            .repository
            .fetch_application(application_id)?
            .ok_or(WorkflowError::NotFound("application"))?;
        let certificate = self.repository.certificate_for_application(application_id)?;
        Ok(ApplicationStatusView::from_parts(
            &application,
            certificate.as_ref(),
        ))
    }

    /// File a deliverable against an accepted application owned by the
    /// caller. Multiple submissions per application are allowed; each is
    /// reviewed independently.
    pub fn submit_deliverable(
        &self,
        student_id: &UserId,
        application_id: &ApplicationId,
        form: DeliverableForm,
    ) -> Result<Submission, WorkflowError> {
        let student = self.guard.resolve_student(student_id)?;

        let application = self
            .repository
            .fetch_application(application_id)?
            .ok_or(WorkflowError::NotFound("application"))?;

        require_owner(&student, &application.student_id, "application")?;

        if application.status != ApplicationStatus::Accepted {
            return Err(WorkflowError::ApplicationNotAccepted);
        }

        let submission = Submission {
            id: next_submission_id(),
            application_id: application.id,
            title: form.title,
            description: form.description,
            project_url: form.project_url,
            repository_url: form.repository_url,
            status: SubmissionStatus::Pending,
            mentor_feedback: None,
            submission_date: Utc::now(),
        };

        Ok(self.repository.insert_submission(submission)?)
    }

    /// Review a pending submission as approved, rejected, or
    /// revision_needed. A reviewed submission is terminal; a revision is a
    /// fresh submission, never a reopened one.
    ///
    /// Approval triggers certificate issuance synchronously. An
    /// already-issued certificate is success, not a review failure.
    pub fn review_submission(
        &self,
        submission_id: &SubmissionId,
        new_status: SubmissionStatus,
        feedback: Option<String>,
        actor_id: &UserId,
    ) -> Result<Submission, WorkflowError> {
        if !new_status.is_review_outcome() {
            return Err(WorkflowError::InvalidStatus(new_status.label()));
        }

        let mut submission = self
            .repository
            .fetch_submission(submission_id)?
            .ok_or(WorkflowError::NotFound("submission"))?;

        let application = self
            .repository
            .fetch_application(&submission.application_id)?
            .ok_or(WorkflowError::NotFound("application"))?;
        let internship = self
            .repository
            .fetch_internship(&application.internship_id)?
            .ok_or(WorkflowError::NotFound("internship"))?;

        self.guard
            .resolve_reviewer(actor_id, &internship.mentor_id, "internship")?;

        if submission.status != SubmissionStatus::Pending {
            return Err(WorkflowError::InvalidTransition {
                from: submission.status.label(),
                to: new_status.label(),
            });
        }

        submission.status = new_status;
        if feedback.is_some() {
            submission.mentor_feedback = feedback;
        }
        self.repository.update_submission(submission.clone())?;

        if new_status == SubmissionStatus::Approved {
            self.issuer.issue(&application, &application.student_id)?;
        }

        Ok(submission)
    }

    /// Issue (or return the existing) certificate for an application with an
    /// approved submission. Idempotent; see [`CertificateIssuer`].
    pub fn issue_certificate_if_eligible(
        &self,
        application_id: &ApplicationId,
        student_id: &UserId,
    ) -> Result<IssuedCertificate, WorkflowError> {
        let application = self
            .repository
            .fetch_application(application_id)?
            .ok_or(WorkflowError::NotFound("application"))?;
        self.issuer.issue(&application, student_id)
    }

    /// Append a weekly progress entry to an accepted application owned by
    /// the caller.
    pub fn log_progress(
        &self,
        student_id: &UserId,
        application_id: &ApplicationId,
        week_number: u16,
        description: String,
    ) -> Result<ProgressEntry, WorkflowError> {
        let student = self.guard.resolve_student(student_id)?;

        let application = self
            .repository
            .fetch_application(application_id)?
            .ok_or(WorkflowError::NotFound("application"))?;

        require_owner(&student, &application.student_id, "application")?;

        if application.status != ApplicationStatus::Accepted {
            return Err(WorkflowError::ApplicationNotAccepted);
        }

        let entry = ProgressEntry {
            id: next_progress_id(),
            application_id: application.id,
            week_number,
            description,
            status: ProgressStatus::Ongoing,
            mentor_comment: None,
            logged_at: Utc::now(),
        };

        Ok(self.repository.insert_progress_entry(entry)?)
    }

    /// Annotate a progress entry as the owning mentor or an admin.
    pub fn comment_progress(
        &self,
        entry_id: &ProgressEntryId,
        comment: String,
        actor_id: &UserId,
    ) -> Result<ProgressEntry, WorkflowError> {
        let mut entry = self
            .repository
            .fetch_progress_entry(entry_id)?
            .ok_or(WorkflowError::NotFound("progress entry"))?;

        let application = self
            .repository
            .fetch_application(&entry.application_id)?
            .ok_or(WorkflowError::NotFound("application"))?;
        let internship = self
            .repository
            .fetch_internship(&application.internship_id)?
            .ok_or(WorkflowError::NotFound("internship"))?;

        self.guard
            .resolve_reviewer(actor_id, &internship.mentor_id, "internship")?;

        entry.mentor_comment = Some(comment);
        self.repository.update_progress_entry(entry.clone())?;
        Ok(entry)
    }
}
