//! Persistence seam for the placement workflows.
//!
//! Every write goes through [`PlacementStore::transaction`]: the closure sees a
//! private view of the store and its effects become visible only when it
//! returns `Ok`. Reads that need a consistent snapshot use
//! [`PlacementStore::read`].

mod memory;
mod sqlite;

pub use memory::InMemoryPlacementStore;
pub use sqlite::SqlitePlacementStore;

use chrono::{DateTime, Utc};

use super::domain::{
    Account, AccountId, Application, ApplicationId, ApplicationStatus, AuditLogEntry,
    CompanyProfile, Document, DocumentId, InterviewPlan, InterviewSchedule, JobDetails, JobId,
    JobPosting, Role, StudentProfile,
};

pub(crate) const USERNAME_CONSTRAINT: &str = "accounts.username";
pub(crate) const APPLICATION_CONSTRAINT: &str = "applications.job_id_student_id";
pub(crate) const STUDENT_PROFILE_CONSTRAINT: &str = "student_profiles.account_id";
pub(crate) const COMPANY_PROFILE_CONSTRAINT: &str = "company_profiles.account_id";
pub(crate) const PROFILE_ROLE_CONSTRAINT: &str = "profiles.account_role";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("constraint {constraint} violated")]
    Conflict { constraint: String },
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub(crate) fn conflict(constraint: &str) -> Self {
        Self::Conflict {
            constraint: constraint.to_string(),
        }
    }

    pub fn is_conflict_on(&self, name: &str) -> bool {
        matches!(self, Self::Conflict { constraint } if constraint == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company_id: AccountId,
    pub details: JobDetails,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewApplication {
    pub job_id: JobId,
    pub student_id: AccountId,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub actor: Option<AccountId>,
    pub action: String,
    pub recorded_at: DateTime<Utc>,
}

/// Read access shared by snapshots and transactions.
///
/// Listing methods return records in identifier order; callers sort for display.
pub trait PlacementReader {
    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;
    fn account_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError>;
    fn accounts(&self, role: Role) -> Result<Vec<Account>, RepositoryError>;

    fn student_profile(&self, id: AccountId) -> Result<Option<StudentProfile>, RepositoryError>;
    fn student_profiles(&self) -> Result<Vec<StudentProfile>, RepositoryError>;
    fn company_profile(&self, id: AccountId) -> Result<Option<CompanyProfile>, RepositoryError>;
    fn company_profiles(&self) -> Result<Vec<CompanyProfile>, RepositoryError>;

    fn job(&self, id: JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn jobs(&self) -> Result<Vec<JobPosting>, RepositoryError>;

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn application_for(
        &self,
        job_id: JobId,
        student_id: AccountId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn applications(&self) -> Result<Vec<Application>, RepositoryError>;

    fn interviews(&self) -> Result<Vec<InterviewSchedule>, RepositoryError>;
    fn documents(&self) -> Result<Vec<Document>, RepositoryError>;
    fn audit_log(&self) -> Result<Vec<AuditLogEntry>, RepositoryError>;
}

/// Mutations available inside [`PlacementStore::transaction`].
pub trait PlacementTx: PlacementReader {
    /// Fails with a conflict on [`USERNAME_CONSTRAINT`] when the username is taken.
    fn insert_account(&mut self, account: NewAccount) -> Result<Account, RepositoryError>;
    fn update_account(&mut self, account: &Account) -> Result<(), RepositoryError>;

    /// Refuses a profile for a non-student account or a second profile.
    fn insert_student_profile(&mut self, profile: StudentProfile) -> Result<(), RepositoryError>;
    fn update_student_profile(&mut self, profile: &StudentProfile) -> Result<(), RepositoryError>;
    /// Refuses a profile for a non-company account or a second profile.
    fn insert_company_profile(&mut self, profile: CompanyProfile) -> Result<(), RepositoryError>;
    fn update_company_profile(&mut self, profile: &CompanyProfile) -> Result<(), RepositoryError>;

    fn insert_job(&mut self, job: NewJob) -> Result<JobPosting, RepositoryError>;
    fn update_job(&mut self, job: &JobPosting) -> Result<(), RepositoryError>;
    /// Removes the job together with its applications and their interviews.
    fn delete_job(&mut self, id: JobId) -> Result<(), RepositoryError>;

    /// Fails with a conflict on [`APPLICATION_CONSTRAINT`] for a repeated pair.
    fn insert_application(
        &mut self,
        application: NewApplication,
    ) -> Result<Application, RepositoryError>;
    fn update_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError>;

    fn insert_interview(
        &mut self,
        application_id: ApplicationId,
        plan: &InterviewPlan,
    ) -> Result<InterviewSchedule, RepositoryError>;

    fn insert_document(&mut self, document: NewDocument) -> Result<Document, RepositoryError>;
    fn delete_document(&mut self, id: DocumentId) -> Result<(), RepositoryError>;

    fn append_audit(&mut self, entry: NewAuditEntry) -> Result<AuditLogEntry, RepositoryError>;
}

/// Storage abstraction so the service can run against memory or SQLite.
pub trait PlacementStore: Send + Sync {
    /// Runs `work` atomically. Nothing it wrote survives an `Err`.
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PlacementTx) -> Result<T, E>,
        E: From<RepositoryError>;

    /// Runs `work` against one consistent snapshot.
    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn PlacementReader) -> Result<T, E>,
        E: From<RepositoryError>;
}
