use chrono::NaiveDate;
use serde::Serialize;

use crate::workflows::placement::domain::{
    Account, Application, ApplicationId, ApplicationStatus, Branch, CompanyProfile,
    InterviewSchedule, JobListingStatus, JobPosting, StudentProfile,
};
use crate::workflows::placement::eligibility::{Eligibility, IneligibilityReason};

pub const POSTED_JOBS_PER_PAGE: usize = 10;
pub const STUDENTS_PER_PAGE: usize = 15;
pub const COMPANIES_PER_PAGE: usize = 15;
pub const JOBS_PER_PAGE: usize = 15;
pub const INTERVIEWS_PER_PAGE: usize = 20;
pub const AUDIT_LOG_PER_PAGE: usize = 25;

/// One page of an ordered listing. Page numbers start at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Zero requests the first page; anything past the end clamps to the last.
    pub fn paginate(items: Vec<T>, requested: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(per_page).max(1);
        let number = requested.clamp(1, total_pages);

        let items: Vec<T> = items
            .into_iter()
            .skip((number - 1) * per_page)
            .take(per_page)
            .collect();

        Self {
            items,
            number,
            per_page,
            total_items,
            total_pages,
            has_previous: number > 1,
            has_next: number < total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

/// Parses a `?page=` value the way the listing pages expect: junk means page 1.
pub fn page_number(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobListing {
    pub job: JobPosting,
    pub company_name: String,
    pub has_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ineligibility: Option<IneligibilityReason>,
}

/// Active jobs split by whether the requesting student may apply.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct JobListings {
    pub eligible: Vec<JobListing>,
    pub ineligible: Vec<JobListing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobDetailState {
    Applied,
    Eligible,
    NotEligible,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetailView {
    pub job: JobPosting,
    pub company_name: String,
    pub state: JobDetailState,
    pub eligibility: Eligibility,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostedJobView {
    pub job: JobPosting,
    pub status: JobListingStatus,
    pub status_label: &'static str,
    pub applicant_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantView {
    pub application: Application,
    pub status_label: &'static str,
    pub student_name: String,
    pub email: String,
    pub profile: StudentProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentApplicationView {
    pub application: Application,
    pub status_label: &'static str,
    pub job_title: String,
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewView {
    pub interview: InterviewSchedule,
    pub job_title: String,
    pub company_name: String,
    pub student_name: String,
    pub is_past: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementStatusView {
    pub is_placed: bool,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<StudentApplicationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRow {
    pub account: Account,
    pub profile: StudentProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRow {
    pub account: Account,
    pub profile: CompanyProfile,
    pub job_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminJobView {
    pub job: JobPosting,
    pub company_name: String,
    pub status: JobListingStatus,
    pub applicant_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewOutcome {
    pub status: ApplicationStatus,
    pub updated: Vec<ApplicationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleOutcome {
    pub scheduled: Vec<InterviewSchedule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferOutcome {
    pub application: Application,
    pub withdrawn: Vec<ApplicationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub usernames: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchStat {
    pub branch: Branch,
    pub branch_label: &'static str,
    pub total: usize,
    pub placed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyJobCount {
    pub company_name: String,
    pub job_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// First day of the month.
    pub month: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CgpaBand {
    pub label: &'static str,
    pub placed: usize,
    pub unplaced: usize,
}
