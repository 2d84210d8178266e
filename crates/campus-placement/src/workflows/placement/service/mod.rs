mod accounts;
mod administration;
mod applications;
mod approvals;
mod jobs;
mod reports;

pub use administration::{InterviewFilter, JobFilter, StudentExportFilter};
pub use jobs::ListingFilter;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use super::access::AccessError;
use super::domain::{
    Account, AccountId, ApplicationId, CompanyProfile, JobId, JobPosting, StudentProfile,
};
use super::eligibility::IneligibilityReason;
use super::export::ExportError;
use super::import::ImportError;
use super::repository::{PlacementReader, PlacementStore, PlacementTx, NewAuditEntry, RepositoryError};
use super::validation::ValidationError;
use crate::config::ReportingConfig;

/// Source of the current time, swappable so deadlines can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Facade over the placement workflows: accounts, jobs, the application
/// lifecycle, approvals and reporting.
pub struct PlacementService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    reporting: ReportingConfig,
}

impl<S> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    pub fn new(store: Arc<S>, reporting: ReportingConfig) -> Self {
        Self::with_clock(store, reporting, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, reporting: ReportingConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            reporting,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error("authentication required")]
    Unauthenticated,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("student is not eligible: {0}")]
    IneligibleStudent(IneligibilityReason),
    #[error("an application for job {job_id} already exists")]
    DuplicateApplication { job_id: JobId },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    #[error("offer could not be extended: {0}")]
    OfferFailed(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PlacementServiceError {
    pub(crate) fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }
}

pub(crate) fn load_account<R>(reader: &R, id: AccountId) -> Result<Account, PlacementServiceError>
where
    R: PlacementReader + ?Sized,
{
    reader
        .account(id)?
        .ok_or_else(|| PlacementServiceError::not_found("account", id.0))
}

pub(crate) fn load_student<R>(
    reader: &R,
    id: AccountId,
) -> Result<StudentProfile, PlacementServiceError>
where
    R: PlacementReader + ?Sized,
{
    reader
        .student_profile(id)?
        .ok_or_else(|| PlacementServiceError::not_found("student profile", id.0))
}

pub(crate) fn load_company<R>(
    reader: &R,
    id: AccountId,
) -> Result<CompanyProfile, PlacementServiceError>
where
    R: PlacementReader + ?Sized,
{
    reader
        .company_profile(id)?
        .ok_or_else(|| PlacementServiceError::not_found("company profile", id.0))
}

pub(crate) fn load_job<R>(reader: &R, id: JobId) -> Result<JobPosting, PlacementServiceError>
where
    R: PlacementReader + ?Sized,
{
    reader
        .job(id)?
        .ok_or_else(|| PlacementServiceError::not_found("job", id.0))
}

/// A job owned by `company`. Someone else's job reads as missing.
pub(crate) fn load_owned_job<R>(
    reader: &R,
    company: AccountId,
    id: JobId,
) -> Result<JobPosting, PlacementServiceError>
where
    R: PlacementReader + ?Sized,
{
    load_job(reader, id).and_then(|job| {
        if job.company_id == company {
            Ok(job)
        } else {
            Err(PlacementServiceError::not_found("job", id.0))
        }
    })
}

pub(crate) fn application_not_found(id: ApplicationId) -> PlacementServiceError {
    PlacementServiceError::not_found("application", id.0)
}

pub(crate) fn audit(
    tx: &mut dyn PlacementTx,
    actor: Option<AccountId>,
    action: String,
    at: DateTime<Utc>,
) -> Result<(), RepositoryError> {
    tx.append_audit(NewAuditEntry {
        actor,
        action,
        recorded_at: at,
    })
    .map(|_| ())
}
