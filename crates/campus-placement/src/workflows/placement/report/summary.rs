use chrono::NaiveDate;
use serde::Serialize;

use crate::workflows::placement::domain::{
    AccountId, ApplicationStatus, JobId, JobPosting, StudentProfile,
};
use super::views::InterviewView;
use super::Snapshot;

const RECENT_JOBS: usize = 5;
const UPCOMING_INTERVIEWS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminDashboard {
    pub total_students: usize,
    pub placed_students: usize,
    pub unplaced_students: usize,
    pub total_companies: usize,
    pub pending_jobs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobApplicationCount {
    pub job_id: JobId,
    pub title: String,
    pub application_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDashboard {
    pub total_jobs_posted: usize,
    pub total_applications: usize,
    pub shortlisted_candidates: usize,
    pub recent_jobs: Vec<JobPosting>,
    pub applications_per_job: Vec<JobApplicationCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDashboard {
    pub applied_jobs: usize,
    pub upcoming_interview_count: usize,
    pub upcoming_interviews: Vec<InterviewView>,
    pub profile_completion_pct: u8,
    pub placement_status: &'static str,
}

pub(crate) fn admin_dashboard(snapshot: &Snapshot) -> AdminDashboard {
    let total_students = snapshot.students.len();
    let placed_students = snapshot
        .students
        .iter()
        .filter(|student| student.is_placed)
        .count();

    AdminDashboard {
        total_students,
        placed_students,
        unplaced_students: total_students - placed_students,
        total_companies: snapshot.companies.len(),
        pending_jobs: pending_job_count(snapshot),
    }
}

/// Unapproved jobs whose company is approved: the admin review queue.
fn pending_job_count(snapshot: &Snapshot) -> usize {
    snapshot
        .jobs
        .iter()
        .filter(|job| !job.is_approved)
        .filter(|job| {
            snapshot
                .companies
                .iter()
                .any(|company| company.account_id == job.company_id && company.is_approved)
        })
        .count()
}

pub(crate) fn company_dashboard(snapshot: &Snapshot, company_id: AccountId) -> CompanyDashboard {
    let own_jobs: Vec<&JobPosting> = snapshot
        .jobs
        .iter()
        .filter(|job| job.company_id == company_id)
        .collect();

    let own_applications = snapshot.applications.iter().filter(|application| {
        own_jobs.iter().any(|job| job.id == application.job_id)
    });
    let (total_applications, shortlisted_candidates) =
        own_applications.fold((0, 0), |(total, shortlisted), application| {
            let shortlisted = shortlisted
                + usize::from(application.status == ApplicationStatus::Shortlisted);
            (total + 1, shortlisted)
        });

    let mut recent_jobs: Vec<JobPosting> = own_jobs.iter().map(|job| (*job).clone()).collect();
    recent_jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));
    recent_jobs.truncate(RECENT_JOBS);

    let mut applications_per_job: Vec<JobApplicationCount> = own_jobs
        .iter()
        .filter(|job| job.is_approved)
        .map(|job| JobApplicationCount {
            job_id: job.id,
            title: job.details.title.clone(),
            application_count: snapshot.applicant_count(job.id),
        })
        .collect();
    applications_per_job.sort_by(|a, b| b.application_count.cmp(&a.application_count));

    CompanyDashboard {
        total_jobs_posted: own_jobs.iter().filter(|job| job.is_approved).count(),
        total_applications,
        shortlisted_candidates,
        recent_jobs,
        applications_per_job,
    }
}

pub(crate) fn student_dashboard(
    snapshot: &Snapshot,
    profile: &StudentProfile,
    today: NaiveDate,
) -> StudentDashboard {
    let student_id = profile.account_id;
    let applied_jobs = snapshot
        .applications
        .iter()
        .filter(|application| application.student_id == student_id)
        .count();

    let upcoming: Vec<InterviewView> = snapshot
        .interviews_where(|application| application.student_id == student_id)
        .into_iter()
        .filter(|interview| interview.plan.interview_date >= today)
        .map(|interview| snapshot.interview_view(interview, today))
        .collect();

    StudentDashboard {
        applied_jobs,
        upcoming_interview_count: upcoming.len(),
        upcoming_interviews: upcoming.into_iter().take(UPCOMING_INTERVIEWS).collect(),
        profile_completion_pct: profile.completion_pct(),
        placement_status: profile.placement_label(),
    }
}
