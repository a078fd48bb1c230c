//! Internship marketplace workflow core.
//!
//! Three managers own the state machines described by the marketplace: the
//! application lifecycle (pending -> accepted/rejected/withdrawn), the
//! deliverable review (pending -> approved/rejected/revision_needed), and
//! the certificate issuer, which mints at most one credential per
//! application no matter how many approvals race for it. Storage and
//! identity sit behind the [`repository`] traits so the same logic runs
//! against the in-memory adapters in tests and the relational store in
//! production.

pub mod access;
pub mod domain;
pub(crate) mod issuance;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use access::{Actor, AccessViolation};
pub use domain::{
    Application, ApplicationForm, ApplicationId, ApplicationStatus, Certificate, CertificateId,
    DeliverableForm, Internship, InternshipForm, InternshipId, InternshipStatus, Profile,
    ProfileUpdate, ProgressEntry, ProgressEntryId, ProgressStatus, Role, Submission, SubmissionId,
    SubmissionStatus, UserId,
};
pub use issuance::IssuedCertificate;
pub use repository::{
    ApplicationStatusView, MarketplaceRepository, ProfileStore, RepositoryError,
};
pub use router::marketplace_router;
pub use service::{MarketplaceService, WorkflowError};
