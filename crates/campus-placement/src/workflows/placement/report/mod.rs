//! Read models for dashboards, analytics and listings. Everything here is
//! recomputed from a single store snapshot per request.

mod analytics;
mod summary;
pub mod views;

pub use analytics::{PlacementAnalytics, PlacementTotals};
pub use summary::{AdminDashboard, CompanyDashboard, JobApplicationCount, StudentDashboard};
pub use views::{
    AdminJobView, ApplicantView, BranchStat, CgpaBand, CompanyJobCount, CompanyRow,
    ImportSummary, InterviewView, JobDetailState, JobDetailView, JobListing, JobListings,
    MonthlyCount, OfferOutcome, Page, PlacementStatusView, PostedJobView, ReviewOutcome,
    ScheduleOutcome, StatusCount, StudentApplicationView, StudentRow,
};

pub(crate) use analytics::compute_analytics;
pub(crate) use summary::{admin_dashboard, company_dashboard, student_dashboard};

use std::collections::HashMap;

use super::domain::{
    Account, AccountId, Application, CompanyProfile, InterviewSchedule, JobId, JobPosting,
    Role, StudentProfile,
};
use super::repository::{PlacementReader, RepositoryError};

/// Everything the read models join over, loaded in one pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct Snapshot {
    pub accounts: HashMap<AccountId, Account>,
    pub students: Vec<StudentProfile>,
    pub companies: Vec<CompanyProfile>,
    pub jobs: Vec<JobPosting>,
    pub applications: Vec<Application>,
    pub interviews: Vec<InterviewSchedule>,
}

impl Snapshot {
    pub(crate) fn load<R>(reader: &R) -> Result<Self, RepositoryError>
    where
        R: PlacementReader + ?Sized,
    {
        let mut accounts = HashMap::new();
        for role in [Role::Student, Role::Company, Role::Admin] {
            for account in reader.accounts(role)? {
                accounts.insert(account.id, account);
            }
        }

        Ok(Self {
            accounts,
            students: reader.student_profiles()?,
            companies: reader.company_profiles()?,
            jobs: reader.jobs()?,
            applications: reader.applications()?,
            interviews: reader.interviews()?,
        })
    }

    pub(crate) fn company_name(&self, id: AccountId) -> String {
        self.companies
            .iter()
            .find(|company| company.account_id == id)
            .map(|company| company.name.clone())
            .unwrap_or_default()
    }

    pub(crate) fn display_name(&self, id: AccountId) -> String {
        self.accounts
            .get(&id)
            .map(Account::full_name)
            .unwrap_or_default()
    }

    pub(crate) fn job(&self, id: JobId) -> Option<&JobPosting> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub(crate) fn applicant_count(&self, job_id: JobId) -> usize {
        self.applications
            .iter()
            .filter(|application| application.job_id == job_id)
            .count()
    }

    pub(crate) fn application_view(&self, application: &Application) -> StudentApplicationView {
        let job = self.job(application.job_id);
        StudentApplicationView {
            application: application.clone(),
            status_label: application.status.label(),
            job_title: job.map(|job| job.details.title.clone()).unwrap_or_default(),
            company_name: job
                .map(|job| self.company_name(job.company_id))
                .unwrap_or_default(),
        }
    }

    pub(crate) fn interview_view(
        &self,
        interview: &InterviewSchedule,
        today: chrono::NaiveDate,
    ) -> InterviewView {
        let application = self
            .applications
            .iter()
            .find(|application| application.id == interview.application_id);
        let job = application.and_then(|application| self.job(application.job_id));

        InterviewView {
            interview: interview.clone(),
            job_title: job.map(|job| job.details.title.clone()).unwrap_or_default(),
            company_name: job
                .map(|job| self.company_name(job.company_id))
                .unwrap_or_default(),
            student_name: application
                .map(|application| self.display_name(application.student_id))
                .unwrap_or_default(),
            is_past: interview.plan.interview_date < today,
        }
    }

    /// Interviews whose application matches `filter`, by date then time.
    pub(crate) fn interviews_where<F>(&self, mut filter: F) -> Vec<&InterviewSchedule>
    where
        F: FnMut(&Application) -> bool,
    {
        let mut selected: Vec<&InterviewSchedule> = self
            .interviews
            .iter()
            .filter(|interview| {
                self.applications
                    .iter()
                    .find(|application| application.id == interview.application_id)
                    .is_some_and(&mut filter)
            })
            .collect();
        selected.sort_by_key(|interview| (interview.plan.interview_date, interview.plan.interview_time));
        selected
    }
}
