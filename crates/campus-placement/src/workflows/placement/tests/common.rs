use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::ReportingConfig;
use crate::workflows::placement::access::Actor;
use crate::workflows::placement::domain::{
    Account, AccountId, AllowedBranches, Application, ApplicationId, ApplicationStatus,
    AuditLogEntry, Branch, CompanyProfile, Document, DocumentId, InterviewMode, InterviewPlan,
    InterviewSchedule, JobDetails, JobId, JobPosting, Role, StudentProfile,
};
use crate::workflows::placement::repository::{
    InMemoryPlacementStore, NewAccount, NewApplication, NewAuditEntry, NewDocument, NewJob,
    PlacementReader, PlacementStore, PlacementTx, RepositoryError,
};
use crate::workflows::placement::service::{FixedClock, PlacementService};
use crate::workflows::placement::validation::{
    AdminRegistration, CompanyRegistration, StudentRegistration,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 1, 9, 30, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn today() -> NaiveDate {
    now().date_naive()
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn reporting() -> ReportingConfig {
    ReportingConfig::default()
}

pub(super) fn service_with_store<S>(store: Arc<S>) -> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    service_at(store, now())
}

pub(super) fn service_at<S>(store: Arc<S>, at: DateTime<Utc>) -> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    PlacementService::with_clock(store, reporting(), Arc::new(FixedClock(at)))
}

pub(super) fn build_service() -> (
    PlacementService<InMemoryPlacementStore>,
    Arc<InMemoryPlacementStore>,
) {
    let store = Arc::new(InMemoryPlacementStore::new());
    (service_with_store(store.clone()), store)
}

pub(super) fn create_admin<S>(service: &PlacementService<S>) -> Actor
where
    S: PlacementStore + 'static,
{
    let account = service
        .create_admin(AdminRegistration {
            username: "tpo".to_string(),
            email: "tpo@campus.edu".to_string(),
            first_name: "Placement".to_string(),
            last_name: "Officer".to_string(),
        })
        .expect("admin created");
    Actor::admin(account.id)
}

pub(super) fn student_registration(
    username: &str,
    branch: Branch,
    cgpa: Option<f32>,
    backlogs: u32,
) -> StudentRegistration {
    StudentRegistration {
        username: username.to_string(),
        email: format!("{username}@campus.edu"),
        first_name: capitalize(username),
        last_name: "Student".to_string(),
        branch,
        cgpa,
        backlogs,
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(super) fn register_student<S>(
    service: &PlacementService<S>,
    username: &str,
    branch: Branch,
    cgpa: Option<f32>,
    backlogs: u32,
) -> Actor
where
    S: PlacementStore + 'static,
{
    let row = service
        .register_student(student_registration(username, branch, cgpa, backlogs))
        .expect("student registered");
    Actor::student(row.account.id)
}

pub(super) fn register_company<S>(service: &PlacementService<S>, name: &str) -> Actor
where
    S: PlacementStore + 'static,
{
    let username = name.to_lowercase().replace(' ', "-");
    let (account, _) = service
        .register_company(CompanyRegistration {
            username: username.clone(),
            email: format!("hr@{username}.com"),
            company_name: name.to_string(),
        })
        .expect("company registered");
    Actor::company(account.id)
}

pub(super) fn approved_company<S>(
    service: &PlacementService<S>,
    admin: &Actor,
    name: &str,
) -> Actor
where
    S: PlacementStore + 'static,
{
    let company = register_company(service, name);
    service
        .approve_company(admin, company.account_id)
        .expect("company approved");
    company
}

pub(super) fn job_details(
    title: &str,
    min_cgpa: Option<f32>,
    max_backlogs: Option<u32>,
    branches: &str,
) -> JobDetails {
    JobDetails {
        title: title.to_string(),
        description: format!("{title} role"),
        salary_range: "6-8 LPA".to_string(),
        location: "Bengaluru".to_string(),
        application_deadline: date(2024, 8, 31),
        min_cgpa,
        max_backlogs,
        allowed_branches: AllowedBranches::parse(branches).expect("valid branch codes"),
    }
}

pub(super) fn approved_job<S>(
    service: &PlacementService<S>,
    admin: &Actor,
    company: &Actor,
    details: JobDetails,
) -> JobPosting
where
    S: PlacementStore + 'static,
{
    let job = service.post_job(company, details).expect("job posted");
    service
        .approve_job(admin, job.id)
        .expect("job approved")
}

pub(super) fn interview_plan() -> InterviewPlan {
    InterviewPlan {
        interview_date: date(2024, 8, 12),
        interview_time: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
        round_name: "Technical Round 1".to_string(),
        mode: InterviewMode::Online,
        venue_or_link: "https://meet.example.com/round-1".to_string(),
        additional_instructions: String::new(),
    }
}

/// An approved company with one approved job open to CSE and ECE, plus an admin.
pub(super) struct Campus<S> {
    pub(super) service: PlacementService<S>,
    pub(super) admin: Actor,
    pub(super) company: Actor,
    pub(super) job: JobPosting,
}

pub(super) fn campus() -> (Campus<InMemoryPlacementStore>, Arc<InMemoryPlacementStore>) {
    let (service, store) = build_service();
    (campus_on(service), store)
}

pub(super) fn campus_on<S>(service: PlacementService<S>) -> Campus<S>
where
    S: PlacementStore + 'static,
{
    let admin = create_admin(&service);
    let company = approved_company(&service, &admin, "Acme Systems");
    let job = approved_job(
        &service,
        &admin,
        &company,
        job_details("Graduate Engineer", Some(7.0), Some(1), "CSE,ECE"),
    );
    Campus {
        service,
        admin,
        company,
        job,
    }
}

pub(super) fn application_status<S>(store: &S, id: ApplicationId) -> ApplicationStatus
where
    S: PlacementStore,
{
    store
        .read(|reader| reader.application(id))
        .expect("store readable")
        .expect("application exists")
        .status
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Where [`FaultyStore`] breaks a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Fault {
    /// The interview insert after `after` successful ones fails.
    InterviewInsert { after: usize },
    StudentProfileUpdate,
    AuditAppend,
}

/// Delegates to an in-memory store but fails one kind of write.
pub(super) struct FaultyStore {
    pub(super) inner: InMemoryPlacementStore,
    fault: Mutex<Option<Fault>>,
}

impl FaultyStore {
    pub(super) fn healthy() -> Self {
        Self {
            inner: InMemoryPlacementStore::new(),
            fault: Mutex::new(None),
        }
    }

    /// Every later transaction hits `fault`.
    pub(super) fn arm(&self, fault: Fault) {
        *self.fault.lock().expect("fault mutex poisoned") = Some(fault);
    }
}

impl PlacementStore for FaultyStore {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PlacementTx) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let fault = *self.fault.lock().expect("fault mutex poisoned");
        self.inner.transaction(|tx| {
            let mut faulty = FaultyTx {
                inner: tx,
                fault,
                interviews_written: 0,
            };
            work(&mut faulty)
        })
    }

    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn PlacementReader) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        self.inner.read(work)
    }
}

/// Delegates to an in-memory store and remembers which threads touched it.
pub(super) struct ThreadRecordingStore {
    pub(super) inner: InMemoryPlacementStore,
    threads: Mutex<Vec<ThreadId>>,
}

impl ThreadRecordingStore {
    pub(super) fn new() -> Self {
        Self {
            inner: InMemoryPlacementStore::new(),
            threads: Mutex::new(Vec::new()),
        }
    }

    /// Threads seen since the last call.
    pub(super) fn take_threads(&self) -> Vec<ThreadId> {
        std::mem::take(&mut *self.threads.lock().expect("thread log poisoned"))
    }

    fn record(&self) {
        self.threads
            .lock()
            .expect("thread log poisoned")
            .push(std::thread::current().id());
    }
}

impl PlacementStore for ThreadRecordingStore {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PlacementTx) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        self.record();
        self.inner.transaction(work)
    }

    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn PlacementReader) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        self.record();
        self.inner.read(work)
    }
}

fn injected() -> RepositoryError {
    RepositoryError::Unavailable("injected failure".to_string())
}

struct FaultyTx<'a> {
    inner: &'a mut dyn PlacementTx,
    fault: Option<Fault>,
    interviews_written: usize,
}

impl PlacementReader for FaultyTx<'_> {
    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        self.inner.account(id)
    }

    fn account_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        self.inner.account_by_username(username)
    }

    fn accounts(&self, role: Role) -> Result<Vec<Account>, RepositoryError> {
        self.inner.accounts(role)
    }

    fn student_profile(&self, id: AccountId) -> Result<Option<StudentProfile>, RepositoryError> {
        self.inner.student_profile(id)
    }

    fn student_profiles(&self) -> Result<Vec<StudentProfile>, RepositoryError> {
        self.inner.student_profiles()
    }

    fn company_profile(&self, id: AccountId) -> Result<Option<CompanyProfile>, RepositoryError> {
        self.inner.company_profile(id)
    }

    fn company_profiles(&self) -> Result<Vec<CompanyProfile>, RepositoryError> {
        self.inner.company_profiles()
    }

    fn job(&self, id: JobId) -> Result<Option<JobPosting>, RepositoryError> {
        self.inner.job(id)
    }

    fn jobs(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        self.inner.jobs()
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.application(id)
    }

    fn application_for(
        &self,
        job_id: JobId,
        student_id: AccountId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.inner.application_for(job_id, student_id)
    }

    fn applications(&self) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications()
    }

    fn interviews(&self) -> Result<Vec<InterviewSchedule>, RepositoryError> {
        self.inner.interviews()
    }

    fn documents(&self) -> Result<Vec<Document>, RepositoryError> {
        self.inner.documents()
    }

    fn audit_log(&self) -> Result<Vec<AuditLogEntry>, RepositoryError> {
        self.inner.audit_log()
    }
}

impl PlacementTx for FaultyTx<'_> {
    fn insert_account(&mut self, account: NewAccount) -> Result<Account, RepositoryError> {
        self.inner.insert_account(account)
    }

    fn update_account(&mut self, account: &Account) -> Result<(), RepositoryError> {
        self.inner.update_account(account)
    }

    fn insert_student_profile(&mut self, profile: StudentProfile) -> Result<(), RepositoryError> {
        self.inner.insert_student_profile(profile)
    }

    fn update_student_profile(&mut self, profile: &StudentProfile) -> Result<(), RepositoryError> {
        if self.fault == Some(Fault::StudentProfileUpdate) {
            return Err(injected());
        }
        self.inner.update_student_profile(profile)
    }

    fn insert_company_profile(&mut self, profile: CompanyProfile) -> Result<(), RepositoryError> {
        self.inner.insert_company_profile(profile)
    }

    fn update_company_profile(&mut self, profile: &CompanyProfile) -> Result<(), RepositoryError> {
        self.inner.update_company_profile(profile)
    }

    fn insert_job(&mut self, job: NewJob) -> Result<JobPosting, RepositoryError> {
        self.inner.insert_job(job)
    }

    fn update_job(&mut self, job: &JobPosting) -> Result<(), RepositoryError> {
        self.inner.update_job(job)
    }

    fn delete_job(&mut self, id: JobId) -> Result<(), RepositoryError> {
        self.inner.delete_job(id)
    }

    fn insert_application(
        &mut self,
        application: NewApplication,
    ) -> Result<Application, RepositoryError> {
        self.inner.insert_application(application)
    }

    fn update_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        self.inner.update_application_status(id, status)
    }

    fn insert_interview(
        &mut self,
        application_id: ApplicationId,
        plan: &InterviewPlan,
    ) -> Result<InterviewSchedule, RepositoryError> {
        if let Some(Fault::InterviewInsert { after }) = self.fault {
            if self.interviews_written >= after {
                return Err(injected());
            }
        }
        let interview = self.inner.insert_interview(application_id, plan)?;
        self.interviews_written += 1;
        Ok(interview)
    }

    fn insert_document(&mut self, document: NewDocument) -> Result<Document, RepositoryError> {
        self.inner.insert_document(document)
    }

    fn delete_document(&mut self, id: DocumentId) -> Result<(), RepositoryError> {
        self.inner.delete_document(id)
    }

    fn append_audit(&mut self, entry: NewAuditEntry) -> Result<AuditLogEntry, RepositoryError> {
        if self.fault == Some(Fault::AuditAppend) {
            return Err(injected());
        }
        self.inner.append_audit(entry)
    }
}

/// A store whose backend is gone.
pub(super) struct UnavailableStore;

impl PlacementStore for UnavailableStore {
    fn transaction<T, E, F>(&self, _work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PlacementTx) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }

    fn read<T, E, F>(&self, _work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn PlacementReader) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }
}
