use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::workflows::internship::domain::{
    Application, ApplicationForm, ApplicationId, ApplicationStatus, Certificate, DeliverableForm,
    Internship, InternshipForm, InternshipId, Profile, ProgressEntry, ProgressEntryId, Role,
    Submission, SubmissionId, UserId,
};
use crate::workflows::internship::repository::{
    MarketplaceRepository, ProfileStore, RepositoryError,
};
use crate::workflows::internship::service::MarketplaceService;

pub(super) const STUDENT: &str = "user_stu_1";
pub(super) const SECOND_STUDENT: &str = "user_stu_2";
pub(super) const MENTOR: &str = "user_men_1";
pub(super) const FOREIGN_MENTOR: &str = "user_men_2";
pub(super) const ADMIN: &str = "user_adm_1";

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn profile(id: &str, role: Role, name: &str) -> Profile {
    Profile {
        id: user(id),
        email: format!("{id}@example.edu"),
        full_name: name.to_string(),
        role: Some(role),
        bio: None,
        location: Some("Des Moines".to_string()),
        skills: vec!["rust".to_string()],
        created_at: Utc::now(),
    }
}

pub(super) fn incomplete_profile(id: &str) -> Profile {
    Profile {
        id: user(id),
        email: format!("{id}@example.edu"),
        full_name: String::new(),
        role: None,
        bio: None,
        location: None,
        skills: Vec::new(),
        created_at: Utc::now(),
    }
}

pub(super) fn internship_form() -> InternshipForm {
    InternshipForm {
        title: "Backend Engineering Intern".to_string(),
        company_name: "Prairie Systems".to_string(),
        description: "Build and ship service endpoints with the platform team.".to_string(),
        location: Some("Remote".to_string()),
        duration_weeks: Some(12),
        required_skills: vec!["rust".to_string(), "sql".to_string()],
    }
}

pub(super) fn application_form() -> ApplicationForm {
    ApplicationForm {
        cover_letter: Some("I have shipped two course projects in Rust.".to_string()),
        resume_url: Some("https://example.edu/resumes/stu-1.pdf".to_string()),
    }
}

pub(super) fn deliverable_form() -> DeliverableForm {
    DeliverableForm {
        title: "Final project".to_string(),
        description: "Inventory service with documented API.".to_string(),
        project_url: Some("https://demo.example.edu/inventory".to_string()),
        repository_url: Some("https://git.example.edu/stu-1/inventory".to_string()),
    }
}

#[derive(Default)]
struct Tables {
    internships: HashMap<InternshipId, Internship>,
    applications: HashMap<ApplicationId, Application>,
    application_pairs: HashSet<(String, String)>,
    submissions: HashMap<SubmissionId, Submission>,
    certificates: HashMap<ApplicationId, Certificate>,
    progress: HashMap<ProgressEntryId, ProgressEntry>,
}

/// In-memory stand-in for the relational store. One mutex spans every table
/// so each insert observes its uniqueness constraint atomically.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRepository {
    pub(super) fn application_count(&self) -> usize {
        self.tables.lock().expect("repository mutex poisoned").applications.len()
    }

    pub(super) fn submission_count(&self) -> usize {
        self.tables.lock().expect("repository mutex poisoned").submissions.len()
    }

    pub(super) fn certificate_count(&self) -> usize {
        self.tables.lock().expect("repository mutex poisoned").certificates.len()
    }
}

impl MarketplaceRepository for MemoryRepository {
    fn insert_internship(&self, internship: Internship) -> Result<Internship, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if guard.internships.contains_key(&internship.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.internships.insert(internship.id.clone(), internship.clone());
        Ok(internship)
    }

    fn update_internship(&self, internship: Internship) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if !guard.internships.contains_key(&internship.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.internships.insert(internship.id.clone(), internship);
        Ok(())
    }

    fn fetch_internship(
        &self,
        id: &InternshipId,
    ) -> Result<Option<Internship>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.internships.get(id).cloned())
    }

    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        let pair = (
            application.student_id.0.clone(),
            application.internship_id.0.clone(),
        );
        if guard.application_pairs.contains(&pair)
            || guard.applications.contains_key(&application.id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.application_pairs.insert(pair);
        guard
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if !guard.applications.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.applications.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.applications.get(id).cloned())
    }

    fn insert_submission(&self, submission: Submission) -> Result<Submission, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if guard.submissions.contains_key(&submission.id) {
            return Err(RepositoryError::Conflict);
        }
        guard
            .submissions
            .insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    fn update_submission(&self, submission: Submission) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if !guard.submissions.contains_key(&submission.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.submissions.insert(submission.id.clone(), submission);
        Ok(())
    }

    fn fetch_submission(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<Submission>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.submissions.get(id).cloned())
    }

    fn submissions_for_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Vec<Submission>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .submissions
            .values()
            .filter(|submission| &submission.application_id == id)
            .cloned()
            .collect())
    }

    fn insert_certificate(
        &self,
        certificate: Certificate,
    ) -> Result<Certificate, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if guard.certificates.contains_key(&certificate.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard
            .certificates
            .insert(certificate.application_id.clone(), certificate.clone());
        Ok(certificate)
    }

    fn certificate_for_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Certificate>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.certificates.get(id).cloned())
    }

    fn insert_progress_entry(
        &self,
        entry: ProgressEntry,
    ) -> Result<ProgressEntry, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if guard.progress.contains_key(&entry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.progress.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    fn update_progress_entry(&self, entry: ProgressEntry) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if !guard.progress.contains_key(&entry.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.progress.insert(entry.id.clone(), entry);
        Ok(())
    }

    fn fetch_progress_entry(
        &self,
        id: &ProgressEntryId,
    ) -> Result<Option<ProgressEntry>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.progress.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
}

impl MemoryProfiles {
    pub(super) fn seed(&self, profile: Profile) {
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .insert(profile.id.clone(), profile);
    }
}

impl ProfileStore for MemoryProfiles {
    fn fetch(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }
}

pub(super) type TestService = MarketplaceService<MemoryRepository, MemoryProfiles>;

/// Service over empty stores with the usual cast of profiles seeded.
pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>, Arc<MemoryProfiles>) {
    let repository = Arc::new(MemoryRepository::default());
    let profiles = Arc::new(MemoryProfiles::default());
    profiles.seed(profile(STUDENT, Role::Student, "Ada Lovelace"));
    profiles.seed(profile(SECOND_STUDENT, Role::Student, "Grace Hopper"));
    profiles.seed(profile(MENTOR, Role::Mentor, "Barbara Liskov"));
    profiles.seed(profile(FOREIGN_MENTOR, Role::Mentor, "Niklaus Wirth"));
    profiles.seed(profile(ADMIN, Role::Admin, "Site Admin"));

    let service = MarketplaceService::new(repository.clone(), profiles.clone());
    (service, repository, profiles)
}

/// Posts an open internship owned by [`MENTOR`].
pub(super) fn posted_internship(service: &TestService) -> Internship {
    service
        .post_internship(&user(MENTOR), internship_form())
        .expect("mentor posts internship")
}

/// Walks STUDENT's application through to accepted status.
pub(super) fn accepted_application(
    service: &TestService,
    internship: &Internship,
) -> Application {
    let application = service
        .apply_to_internship(&user(STUDENT), &internship.id, application_form())
        .expect("student applies");
    service
        .review_application(&application.id, ApplicationStatus::Accepted, &user(MENTOR))
        .expect("mentor accepts")
}
