use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for user identities handed to us by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for posted internships.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InternshipId(pub String);

/// Identifier wrapper for student applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for deliverable submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Identifier wrapper for completion certificates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(pub String);

/// Identifier wrapper for weekly progress entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressEntryId(pub String);

/// Marketplace roles resolved from the profile store, never from client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Mentor,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Mentor => "mentor",
            Role::Admin => "admin",
        }
    }
}

/// A user's role record. A profile without a role is incomplete and blocks
/// every workflow action for that user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub role: Option<Role>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn is_complete(&self) -> bool {
        self.role.is_some() && !self.full_name.trim().is_empty()
    }
}

/// Edits a user may apply to their own profile. The role is write-once:
/// accepted while the profile has none, rejected once authorizations hang
/// off it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

/// Listing lifecycle for a posted internship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternshipStatus {
    Open,
    Closed,
    Filled,
}

impl InternshipStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InternshipStatus::Open => "open",
            InternshipStatus::Closed => "closed",
            InternshipStatus::Filled => "filled",
        }
    }

    pub const fn accepts_applications(self) -> bool {
        matches!(self, InternshipStatus::Open)
    }
}

/// An opportunity posted by a mentor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Internship {
    pub id: InternshipId,
    pub mentor_id: UserId,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub location: Option<String>,
    pub duration_weeks: Option<u16>,
    pub required_skills: Vec<String>,
    pub status: InternshipStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields a mentor supplies when posting an internship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternshipForm {
    pub title: String,
    pub company_name: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub duration_weeks: Option<u16>,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

/// Status tracked for the central application workflow entity.
///
/// The legal edges form a closed set: `pending -> accepted`, `pending ->
/// rejected`, and the student-initiated `pending|accepted -> withdrawn`.
/// `rejected` and `withdrawn` are terminal; nothing moves a status backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Withdrawn)
    }

    /// Whether `next` is reachable from `self` along any legal edge,
    /// regardless of which actor drives the move.
    pub const fn can_become(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Pending, ApplicationStatus::Accepted)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
                | (ApplicationStatus::Pending, ApplicationStatus::Withdrawn)
                | (ApplicationStatus::Accepted, ApplicationStatus::Withdrawn)
        )
    }

    /// The subset of targets a reviewing mentor or admin may request.
    pub const fn is_review_outcome(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

/// A student's request to join a specific internship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub internship_id: InternshipId,
    pub student_id: UserId,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
    /// Set once, on the first transition away from `pending`.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Fields a student supplies when applying.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationForm {
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
}

/// Review status of one deliverable. A reviewed submission never reopens; a
/// revision arrives as a fresh `Submission` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
    RevisionNeeded,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::RevisionNeeded => "revision_needed",
        }
    }

    /// Valid targets of a mentor review. `pending` is where a submission
    /// starts, never where a review sends it.
    pub const fn is_review_outcome(self) -> bool {
        matches!(
            self,
            SubmissionStatus::Approved
                | SubmissionStatus::Rejected
                | SubmissionStatus::RevisionNeeded
        )
    }
}

/// A deliverable filed by a student against an accepted application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub application_id: ApplicationId,
    pub title: String,
    pub description: String,
    pub project_url: Option<String>,
    pub repository_url: Option<String>,
    pub status: SubmissionStatus,
    pub mentor_feedback: Option<String>,
    pub submission_date: DateTime<Utc>,
}

/// Fields a student supplies when filing a deliverable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverableForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
}

/// Completion credential, at most one per application, immutable once issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: CertificateId,
    pub application_id: ApplicationId,
    pub student_id: UserId,
    pub title: String,
    pub issued_at: DateTime<Utc>,
}

/// Status of one weekly progress entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Ongoing,
    Completed,
    PendingReview,
}

impl ProgressStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProgressStatus::Ongoing => "ongoing",
            ProgressStatus::Completed => "completed",
            ProgressStatus::PendingReview => "pending_review",
        }
    }
}

/// Weekly log tied to an accepted application. Students append, mentors
/// annotate; the entry never feeds the certificate invariant chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: ProgressEntryId,
    pub application_id: ApplicationId,
    pub week_number: u16,
    pub description: String,
    pub status: ProgressStatus,
    pub mentor_comment: Option<String>,
    pub logged_at: DateTime<Utc>,
}
