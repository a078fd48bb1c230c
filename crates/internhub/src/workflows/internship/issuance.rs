use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::domain::{Application, Certificate, CertificateId, SubmissionStatus, UserId};
use super::repository::{MarketplaceRepository, RepositoryError};
use super::service::WorkflowError;

/// Result of an issuance attempt. `already_existed` distinguishes the
/// idempotent replay from the first issue without treating either as failure.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCertificate {
    pub certificate: Certificate,
    pub already_existed: bool,
}

static CERTIFICATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_certificate_id() -> CertificateId {
    let id = CERTIFICATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CertificateId(format!("cert-{id:06}"))
}

/// Issues at most one certificate per application.
///
/// The insert relies on the repository's uniqueness constraint on
/// `application_id`: the issuer always attempts the write and converts a
/// constraint conflict into a fetch of the existing row. There is no
/// unguarded exists-then-insert window, so two near-simultaneous approvals
/// of different submissions under one application cannot mint two
/// certificates.
pub struct CertificateIssuer<R> {
    repository: Arc<R>,
}

impl<R> CertificateIssuer<R>
where
    R: MarketplaceRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn issue(
        &self,
        application: &Application,
        student_id: &UserId,
    ) -> Result<IssuedCertificate, WorkflowError> {
        if &application.student_id != student_id {
            return Err(WorkflowError::ApplicationMismatch);
        }

        let has_approved = self
            .repository
            .submissions_for_application(&application.id)?
            .iter()
            .any(|submission| submission.status == SubmissionStatus::Approved);
        if !has_approved {
            return Err(WorkflowError::SubmissionNotApproved);
        }

        let internship = self
            .repository
            .fetch_internship(&application.internship_id)?
            .ok_or(WorkflowError::NotFound("internship"))?;

        let certificate = Certificate {
            id: next_certificate_id(),
            application_id: application.id.clone(),
            student_id: student_id.clone(),
            title: format!("Certificate of Completion - {}", internship.title),
            issued_at: Utc::now(),
        };

        match self.repository.insert_certificate(certificate) {
            Ok(certificate) => Ok(IssuedCertificate {
                certificate,
                already_existed: false,
            }),
            Err(RepositoryError::Conflict) => {
                // The constraint fired: somebody else won the race. Surface
                // their row as the success path.
                let existing = self
                    .repository
                    .certificate_for_application(&application.id)?
                    .ok_or(RepositoryError::Conflict)?;
                Ok(IssuedCertificate {
                    certificate: existing,
                    already_existed: true,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}
