use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{
    NewAccount, NewApplication, NewAuditEntry, NewDocument, NewJob, PlacementReader,
    PlacementStore, PlacementTx, RepositoryError, APPLICATION_CONSTRAINT,
    COMPANY_PROFILE_CONSTRAINT, PROFILE_ROLE_CONSTRAINT, STUDENT_PROFILE_CONSTRAINT,
    USERNAME_CONSTRAINT,
};
use crate::workflows::placement::domain::{
    Account, AccountId, Application, ApplicationId, ApplicationStatus, AuditLogEntry, AuditLogId,
    CompanyProfile, Document, DocumentId, InterviewId, InterviewPlan, InterviewSchedule, JobId,
    JobPosting, Role, StudentProfile,
};

#[derive(Debug, Clone, Default)]
struct Sequences {
    account: u64,
    job: u64,
    application: u64,
    interview: u64,
    document: u64,
    audit: u64,
}

fn next(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    sequences: Sequences,
    accounts: BTreeMap<AccountId, Account>,
    students: BTreeMap<AccountId, StudentProfile>,
    companies: BTreeMap<AccountId, CompanyProfile>,
    jobs: BTreeMap<JobId, JobPosting>,
    applications: BTreeMap<ApplicationId, Application>,
    interviews: BTreeMap<InterviewId, InterviewSchedule>,
    documents: BTreeMap<DocumentId, Document>,
    audit: Vec<AuditLogEntry>,
}

impl StoreState {
    fn require_role(&self, id: AccountId, role: Role) -> Result<(), RepositoryError> {
        match self.accounts.get(&id) {
            None => Err(RepositoryError::NotFound),
            Some(account) if account.role != role => {
                Err(RepositoryError::conflict(PROFILE_ROLE_CONSTRAINT))
            }
            Some(_) => Ok(()),
        }
    }
}

/// Mutex-guarded store. Transactions work on a copy that replaces the live
/// state only when the closure succeeds.
#[derive(Debug, Default)]
pub struct InMemoryPlacementStore {
    state: Mutex<StoreState>,
}

impl InMemoryPlacementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".to_string())
}

impl PlacementStore for InMemoryPlacementStore {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PlacementTx) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.state.lock().map_err(poisoned)?;
        let mut working = guard.clone();
        let value = work(&mut working)?;
        *guard = working;
        Ok(value)
    }

    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn PlacementReader) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let guard = self.state.lock().map_err(poisoned)?;
        work(&*guard)
    }
}

impl PlacementReader for StoreState {
    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.get(&id).cloned())
    }

    fn account_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .accounts
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    fn accounts(&self, role: Role) -> Result<Vec<Account>, RepositoryError> {
        Ok(self
            .accounts
            .values()
            .filter(|account| account.role == role)
            .cloned()
            .collect())
    }

    fn student_profile(&self, id: AccountId) -> Result<Option<StudentProfile>, RepositoryError> {
        Ok(self.students.get(&id).cloned())
    }

    fn student_profiles(&self) -> Result<Vec<StudentProfile>, RepositoryError> {
        Ok(self.students.values().cloned().collect())
    }

    fn company_profile(&self, id: AccountId) -> Result<Option<CompanyProfile>, RepositoryError> {
        Ok(self.companies.get(&id).cloned())
    }

    fn company_profiles(&self) -> Result<Vec<CompanyProfile>, RepositoryError> {
        Ok(self.companies.values().cloned().collect())
    }

    fn job(&self, id: JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(self.jobs.get(&id).cloned())
    }

    fn jobs(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        Ok(self.jobs.values().cloned().collect())
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.applications.get(&id).cloned())
    }

    fn application_for(
        &self,
        job_id: JobId,
        student_id: AccountId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self
            .applications
            .values()
            .find(|application| {
                application.job_id == job_id && application.student_id == student_id
            })
            .cloned())
    }

    fn applications(&self) -> Result<Vec<Application>, RepositoryError> {
        Ok(self.applications.values().cloned().collect())
    }

    fn interviews(&self) -> Result<Vec<InterviewSchedule>, RepositoryError> {
        Ok(self.interviews.values().cloned().collect())
    }

    fn documents(&self) -> Result<Vec<Document>, RepositoryError> {
        Ok(self.documents.values().cloned().collect())
    }

    fn audit_log(&self) -> Result<Vec<AuditLogEntry>, RepositoryError> {
        Ok(self.audit.clone())
    }
}

impl PlacementTx for StoreState {
    fn insert_account(&mut self, account: NewAccount) -> Result<Account, RepositoryError> {
        if self
            .accounts
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(RepositoryError::conflict(USERNAME_CONSTRAINT));
        }

        let id = AccountId(next(&mut self.sequences.account));
        let stored = Account {
            id,
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            role: account.role,
            created_at: account.created_at,
        };
        self.accounts.insert(id, stored.clone());
        Ok(stored)
    }

    fn update_account(&mut self, account: &Account) -> Result<(), RepositoryError> {
        let existing = self
            .accounts
            .get_mut(&account.id)
            .ok_or(RepositoryError::NotFound)?;
        // Username and role are fixed at creation.
        existing.email = account.email.clone();
        existing.first_name = account.first_name.clone();
        existing.last_name = account.last_name.clone();
        Ok(())
    }

    fn insert_student_profile(&mut self, profile: StudentProfile) -> Result<(), RepositoryError> {
        self.require_role(profile.account_id, Role::Student)?;
        if self.students.contains_key(&profile.account_id) {
            return Err(RepositoryError::conflict(STUDENT_PROFILE_CONSTRAINT));
        }
        self.students.insert(profile.account_id, profile);
        Ok(())
    }

    fn update_student_profile(&mut self, profile: &StudentProfile) -> Result<(), RepositoryError> {
        let slot = self
            .students
            .get_mut(&profile.account_id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = profile.clone();
        Ok(())
    }

    fn insert_company_profile(&mut self, profile: CompanyProfile) -> Result<(), RepositoryError> {
        self.require_role(profile.account_id, Role::Company)?;
        if self.companies.contains_key(&profile.account_id) {
            return Err(RepositoryError::conflict(COMPANY_PROFILE_CONSTRAINT));
        }
        self.companies.insert(profile.account_id, profile);
        Ok(())
    }

    fn update_company_profile(&mut self, profile: &CompanyProfile) -> Result<(), RepositoryError> {
        let slot = self
            .companies
            .get_mut(&profile.account_id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = profile.clone();
        Ok(())
    }

    fn insert_job(&mut self, job: NewJob) -> Result<JobPosting, RepositoryError> {
        if !self.companies.contains_key(&job.company_id) {
            return Err(RepositoryError::NotFound);
        }

        let id = JobId(next(&mut self.sequences.job));
        let stored = JobPosting {
            id,
            company_id: job.company_id,
            details: job.details,
            is_approved: false,
            posted_at: job.posted_at,
        };
        self.jobs.insert(id, stored.clone());
        Ok(stored)
    }

    fn update_job(&mut self, job: &JobPosting) -> Result<(), RepositoryError> {
        let slot = self.jobs.get_mut(&job.id).ok_or(RepositoryError::NotFound)?;
        *slot = job.clone();
        Ok(())
    }

    fn delete_job(&mut self, id: JobId) -> Result<(), RepositoryError> {
        self.jobs.remove(&id).ok_or(RepositoryError::NotFound)?;

        let removed: Vec<ApplicationId> = self
            .applications
            .values()
            .filter(|application| application.job_id == id)
            .map(|application| application.id)
            .collect();
        for application_id in &removed {
            self.applications.remove(application_id);
        }
        self.interviews
            .retain(|_, interview| !removed.contains(&interview.application_id));
        Ok(())
    }

    fn insert_application(
        &mut self,
        application: NewApplication,
    ) -> Result<Application, RepositoryError> {
        if !self.jobs.contains_key(&application.job_id)
            || !self.students.contains_key(&application.student_id)
        {
            return Err(RepositoryError::NotFound);
        }
        if self
            .application_for(application.job_id, application.student_id)?
            .is_some()
        {
            return Err(RepositoryError::conflict(APPLICATION_CONSTRAINT));
        }

        let id = ApplicationId(next(&mut self.sequences.application));
        let stored = Application {
            id,
            job_id: application.job_id,
            student_id: application.student_id,
            status: ApplicationStatus::Applied,
            applied_at: application.applied_at,
        };
        self.applications.insert(id, stored.clone());
        Ok(stored)
    }

    fn update_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        let application = self
            .applications
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        application.status = status;
        Ok(())
    }

    fn insert_interview(
        &mut self,
        application_id: ApplicationId,
        plan: &InterviewPlan,
    ) -> Result<InterviewSchedule, RepositoryError> {
        if !self.applications.contains_key(&application_id) {
            return Err(RepositoryError::NotFound);
        }

        let id = InterviewId(next(&mut self.sequences.interview));
        let stored = InterviewSchedule {
            id,
            application_id,
            plan: plan.clone(),
        };
        self.interviews.insert(id, stored.clone());
        Ok(stored)
    }

    fn insert_document(&mut self, document: NewDocument) -> Result<Document, RepositoryError> {
        let id = DocumentId(next(&mut self.sequences.document));
        let stored = Document {
            id,
            title: document.title,
            file_name: document.file_name,
            content_type: document.content_type,
            uploaded_at: document.uploaded_at,
        };
        self.documents.insert(id, stored.clone());
        Ok(stored)
    }

    fn delete_document(&mut self, id: DocumentId) -> Result<(), RepositoryError> {
        self.documents
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn append_audit(&mut self, entry: NewAuditEntry) -> Result<AuditLogEntry, RepositoryError> {
        let stored = AuditLogEntry {
            id: AuditLogId(next(&mut self.sequences.audit)),
            actor: entry.actor,
            action: entry.action,
            recorded_at: entry.recorded_at,
        };
        self.audit.push(stored.clone());
        Ok(stored)
    }
}
