use serde::Serialize;

use super::domain::{
    Application, ApplicationId, Certificate, Internship, InternshipId, Profile, ProgressEntry,
    ProgressEntryId, Submission, SubmissionId, UserId,
};

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the relational store backing the marketplace.
///
/// Two methods carry uniqueness contracts the workflow relies on:
/// `insert_application` must reject a second row for the same
/// `(student_id, internship_id)` pair with [`RepositoryError::Conflict`], and
/// `insert_certificate` must do the same for a second certificate on one
/// application. Both checks have to happen atomically with the write, the way
/// a relational unique index would, so concurrent duplicate inserts cannot
/// both succeed.
pub trait MarketplaceRepository: Send + Sync {
    fn insert_internship(&self, internship: Internship) -> Result<Internship, RepositoryError>;
    fn update_internship(&self, internship: Internship) -> Result<(), RepositoryError>;
    fn fetch_internship(&self, id: &InternshipId)
        -> Result<Option<Internship>, RepositoryError>;

    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn update_application(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<Application>, RepositoryError>;

    fn insert_submission(&self, submission: Submission) -> Result<Submission, RepositoryError>;
    fn update_submission(&self, submission: Submission) -> Result<(), RepositoryError>;
    fn fetch_submission(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError>;
    fn submissions_for_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Vec<Submission>, RepositoryError>;

    fn insert_certificate(&self, certificate: Certificate)
        -> Result<Certificate, RepositoryError>;
    fn certificate_for_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Certificate>, RepositoryError>;

    fn insert_progress_entry(&self, entry: ProgressEntry)
        -> Result<ProgressEntry, RepositoryError>;
    fn update_progress_entry(&self, entry: ProgressEntry) -> Result<(), RepositoryError>;
    fn fetch_progress_entry(
        &self,
        id: &ProgressEntryId,
    ) -> Result<Option<ProgressEntry>, RepositoryError>;
}

/// Profile lookups backing per-operation authorization. Roles are always
/// re-resolved through this seam inside the operation that needs them.
pub trait ProfileStore: Send + Sync {
    fn fetch(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError>;
    fn upsert(&self, profile: Profile) -> Result<Profile, RepositoryError>;
}

/// Sanitized snapshot of an application's externally visible state.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub status: &'static str,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub certificate_issued: bool,
}

impl ApplicationStatusView {
    pub fn from_parts(application: &Application, certificate: Option<&Certificate>) -> Self {
        Self {
            application_id: application.id.clone(),
            status: application.status.label(),
            submitted_at: application.submitted_at,
            reviewed_at: application.reviewed_at,
            certificate_issued: certificate.is_some(),
        }
    }
}
