use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use super::views::{BranchStat, CgpaBand, CompanyJobCount, MonthlyCount, StatusCount};
use super::Snapshot;
use crate::config::ReportingConfig;
use crate::workflows::placement::domain::{ApplicationStatus, Branch};

const CGPA_BANDS: [(f32, f32, &str); 4] = [
    (6.0, 7.0, "6.0-6.9"),
    (7.0, 8.0, "7.0-7.9"),
    (8.0, 9.0, "8.0-8.9"),
    (9.0, 10.0, "9.0-10.0"),
];

const FUNNEL: [ApplicationStatus; 3] = [
    ApplicationStatus::Shortlisted,
    ApplicationStatus::Interview,
    ApplicationStatus::Offered,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementTotals {
    pub total_students: usize,
    pub placed_students: usize,
    pub total_companies: usize,
    pub total_jobs: usize,
    pub total_applications: usize,
    pub total_interviews: usize,
    pub placement_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementAnalytics {
    pub branches: Vec<BranchStat>,
    pub top_companies: Vec<CompanyJobCount>,
    pub status_distribution: Vec<StatusCount>,
    pub monthly_applications: Vec<MonthlyCount>,
    pub cgpa_bands: Vec<CgpaBand>,
    pub interview_funnel: Vec<StatusCount>,
    pub totals: PlacementTotals,
}

pub(crate) fn compute_analytics(
    snapshot: &Snapshot,
    config: &ReportingConfig,
    now: DateTime<Utc>,
) -> PlacementAnalytics {
    PlacementAnalytics {
        branches: branch_stats(snapshot),
        top_companies: top_companies(snapshot, config.top_companies),
        status_distribution: status_counts(snapshot, &ApplicationStatus::ordered()),
        monthly_applications: monthly_applications(snapshot, now, config.trend_window_days),
        cgpa_bands: cgpa_bands(snapshot),
        interview_funnel: status_counts(snapshot, &FUNNEL),
        totals: totals(snapshot),
    }
}

fn branch_stats(snapshot: &Snapshot) -> Vec<BranchStat> {
    let mut stats: Vec<BranchStat> = Branch::ordered()
        .into_iter()
        .map(|branch| {
            let students = snapshot
                .students
                .iter()
                .filter(|student| student.branch == branch);
            let (total, placed) = students.fold((0, 0), |(total, placed), student| {
                (total + 1, placed + usize::from(student.is_placed))
            });
            BranchStat {
                branch,
                branch_label: branch.label(),
                total,
                placed,
            }
        })
        .filter(|stat| stat.total > 0)
        .collect();

    // Stable sort keeps department order among equal totals.
    stats.sort_by(|a, b| b.total.cmp(&a.total));
    stats
}

fn top_companies(snapshot: &Snapshot, limit: usize) -> Vec<CompanyJobCount> {
    let mut counts: Vec<CompanyJobCount> = snapshot
        .companies
        .iter()
        .map(|company| CompanyJobCount {
            company_name: company.name.clone(),
            job_count: snapshot
                .jobs
                .iter()
                .filter(|job| job.company_id == company.account_id)
                .count(),
        })
        .filter(|entry| entry.job_count > 0)
        .collect();

    counts.sort_by(|a, b| {
        b.job_count
            .cmp(&a.job_count)
            .then_with(|| a.company_name.cmp(&b.company_name))
    });
    counts.truncate(limit);
    counts
}

fn status_counts(snapshot: &Snapshot, statuses: &[ApplicationStatus]) -> Vec<StatusCount> {
    statuses
        .iter()
        .map(|status| StatusCount {
            status: *status,
            label: status.label(),
            count: snapshot
                .applications
                .iter()
                .filter(|application| application.status == *status)
                .count(),
        })
        .collect()
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn monthly_applications(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    window_days: u32,
) -> Vec<MonthlyCount> {
    // Windows reaching past the earliest representable instant cover everything.
    let since = now
        .checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut buckets: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    for application in &snapshot.applications {
        if application.applied_at >= since {
            *buckets
                .entry(month_start(application.applied_at.date_naive()))
                .or_default() += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

fn cgpa_bands(snapshot: &Snapshot) -> Vec<CgpaBand> {
    CGPA_BANDS
        .into_iter()
        .map(|(low, high, label)| {
            // The top band is closed so a perfect 10.0 is counted.
            let in_band = |cgpa: f32| {
                if high >= 10.0 {
                    cgpa >= low && cgpa <= high
                } else {
                    cgpa >= low && cgpa < high
                }
            };
            let (placed, unplaced) = snapshot
                .students
                .iter()
                .filter(|student| student.cgpa.is_some_and(|cgpa| in_band(cgpa)))
                .fold((0, 0), |(placed, unplaced), student| {
                    if student.is_placed {
                        (placed + 1, unplaced)
                    } else {
                        (placed, unplaced + 1)
                    }
                });
            CgpaBand {
                label,
                placed,
                unplaced,
            }
        })
        .collect()
}

fn totals(snapshot: &Snapshot) -> PlacementTotals {
    let total_students = snapshot.students.len();
    let placed_students = snapshot
        .students
        .iter()
        .filter(|student| student.is_placed)
        .count();
    let placement_percentage = if total_students == 0 {
        0.0
    } else {
        let pct = placed_students as f64 / total_students as f64 * 100.0;
        (pct * 100.0).round() / 100.0
    };

    PlacementTotals {
        total_students,
        placed_students,
        total_companies: snapshot
            .companies
            .iter()
            .filter(|company| company.is_approved)
            .count(),
        total_jobs: snapshot.jobs.iter().filter(|job| job.is_approved).count(),
        total_applications: snapshot.applications.len(),
        total_interviews: snapshot.interviews.len(),
        placement_percentage,
    }
}
