use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use internhub::workflows::internship::{
    Application, ApplicationId, Certificate, Internship, InternshipId, MarketplaceRepository,
    Profile, ProfileStore, ProgressEntry, ProgressEntryId, RepositoryError, Role, Submission,
    SubmissionId, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct MarketplaceTables {
    internships: HashMap<InternshipId, Internship>,
    applications: HashMap<ApplicationId, Application>,
    application_pairs: HashSet<(String, String)>,
    submissions: HashMap<SubmissionId, Submission>,
    certificates: HashMap<ApplicationId, Certificate>,
    progress: HashMap<ProgressEntryId, ProgressEntry>,
}

/// In-memory marketplace store. One mutex spans every table so each insert
/// observes its uniqueness constraint atomically, the same guarantee the
/// relational store's unique indexes give in production.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMarketplaceRepository {
    tables: Arc<Mutex<MarketplaceTables>>,
}

impl MarketplaceRepository for InMemoryMarketplaceRepository {
    fn insert_internship(&self, internship: Internship) -> Result<Internship, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if guard.internships.contains_key(&internship.id) {
            return Err(RepositoryError::Conflict);
        }
        guard
            .internships
            .insert(internship.id.clone(), internship.clone());
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

    fn fetch_internship(&self, id: &InternshipId) -> Result<Option<Internship>, RepositoryError> {
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
        if guard.application_pairs.contains(&pair) {
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
        guard
            .applications
            .insert(application.id.clone(), application);
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

    fn fetch_submission(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError> {
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

    fn insert_certificate(&self, certificate: Certificate) -> Result<Certificate, RepositoryError> {
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

    fn insert_progress_entry(&self, entry: ProgressEntry) -> Result<ProgressEntry, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
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
pub(crate) struct InMemoryProfileStore {
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
}

impl ProfileStore for InMemoryProfileStore {
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

/// Build a complete profile with a fixed role, bypassing the default-role
/// path of `ensure_profile`. Used for demo seeding.
pub(crate) fn seeded_profile(id: &str, role: Role, full_name: &str) -> Profile {
    Profile {
        id: UserId(id.to_string()),
        email: format!("{id}@internhub.example"),
        full_name: full_name.to_string(),
        role: Some(role),
        bio: None,
        location: None,
        skills: Vec::new(),
        created_at: Utc::now(),
    }
}
