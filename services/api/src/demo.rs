use campus_placement::config::ReportingConfig;
use campus_placement::error::AppError;
use campus_placement::workflows::placement::{
    Actor, AdminRegistration, AllowedBranches, Branch, CompanyRegistration, FixedClock,
    InMemoryPlacementStore, InterviewMode, InterviewPlan, JobDetails, JobPosting,
    ListingFilter, PlacementService, ReviewAction, StudentProfileUpdate, StudentRegistration,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use clap::Args;
use std::sync::Arc;

type DemoService = PlacementService<InMemoryPlacementStore>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the season is replayed on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

struct DemoStudent {
    username: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    branch: Branch,
    cgpa: f32,
    backlogs: u32,
    skills: &'static [&'static str],
}

const STUDENTS: [DemoStudent; 5] = [
    DemoStudent {
        username: "ananya",
        first_name: "Ananya",
        last_name: "Iyer",
        branch: Branch::ComputerScience,
        cgpa: 8.7,
        backlogs: 0,
        skills: &["Rust", "PostgreSQL"],
    },
    DemoStudent {
        username: "farhan",
        first_name: "Farhan",
        last_name: "Sheikh",
        branch: Branch::ComputerScience,
        cgpa: 7.4,
        backlogs: 1,
        skills: &["Java", "Spring"],
    },
    DemoStudent {
        username: "lakshmi",
        first_name: "Lakshmi",
        last_name: "Menon",
        branch: Branch::ElectronicsCommunication,
        cgpa: 9.1,
        backlogs: 0,
        skills: &["Verilog", "Embedded C"],
    },
    DemoStudent {
        username: "arjun",
        first_name: "Arjun",
        last_name: "Patil",
        branch: Branch::Mechanical,
        cgpa: 6.8,
        backlogs: 0,
        skills: &["SolidWorks"],
    },
    DemoStudent {
        username: "neha",
        first_name: "Neha",
        last_name: "Gupta",
        branch: Branch::ElectricalElectronics,
        cgpa: 8.0,
        backlogs: 0,
        skills: &["MATLAB", "Power Systems"],
    },
];

fn demo_service(as_of: NaiveDate) -> DemoService {
    let now = as_of
        .and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN))
        .and_utc();
    PlacementService::with_clock(
        Arc::new(InMemoryPlacementStore::new()),
        ReportingConfig::default(),
        Arc::new(FixedClock(now)),
    )
}

fn company(
    service: &DemoService,
    admin: &Actor,
    username: &str,
    name: &str,
) -> Result<Actor, AppError> {
    let (account, _) = service.register_company(CompanyRegistration {
        username: username.to_string(),
        email: format!("campus@{username}.example.com"),
        company_name: name.to_string(),
    })?;
    service.approve_company(admin, account.id)?;
    Ok(Actor::company(account.id))
}

fn job(
    service: &DemoService,
    admin: &Actor,
    company: &Actor,
    details: JobDetails,
) -> Result<JobPosting, AppError> {
    let posted = service.post_job(company, details)?;
    Ok(service.approve_job(admin, posted.id)?)
}

fn details(
    title: &str,
    location: &str,
    deadline: NaiveDate,
    min_cgpa: f32,
    max_backlogs: u32,
    branches: &[Branch],
) -> JobDetails {
    JobDetails {
        title: title.to_string(),
        description: format!("{title} for the {} graduating batch", deadline.format("%Y")),
        salary_range: "8-12 LPA".to_string(),
        location: location.to_string(),
        application_deadline: deadline,
        min_cgpa: Some(min_cgpa),
        max_backlogs: Some(max_backlogs),
        allowed_branches: AllowedBranches::new(branches.iter().copied()),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let deadline = as_of + Duration::days(21);
    let service = demo_service(as_of);

    println!("Campus placement demo (as of {as_of})");
    let admin = service.create_admin(AdminRegistration {
        username: "tpo".to_string(),
        email: "tpo@college.example.edu".to_string(),
        first_name: "Training & Placement".to_string(),
        last_name: "Officer".to_string(),
    })?;
    let admin = Actor::admin(admin.id);

    let northwind = company(&service, &admin, "northwind", "Northwind Systems")?;
    let voltline = company(&service, &admin, "voltline", "Voltline Power")?;
    let backend = job(
        &service,
        &admin,
        &northwind,
        details(
            "Backend Engineer",
            "Bengaluru",
            deadline,
            7.5,
            0,
            &[Branch::ComputerScience, Branch::ElectronicsCommunication],
        ),
    )?;
    let grid = job(
        &service,
        &admin,
        &voltline,
        details(
            "Graduate Engineer Trainee",
            "Nagpur",
            deadline,
            6.5,
            1,
            &[Branch::ElectricalElectronics, Branch::Mechanical],
        ),
    )?;
    println!("- 2 companies approved, 2 jobs live until {deadline}");

    let mut students = Vec::with_capacity(STUDENTS.len());
    for seed in &STUDENTS {
        let row = service.register_student(StudentRegistration {
            username: seed.username.to_string(),
            email: format!("{}@college.example.edu", seed.username),
            first_name: seed.first_name.to_string(),
            last_name: seed.last_name.to_string(),
            branch: seed.branch,
            cgpa: Some(seed.cgpa),
            backlogs: seed.backlogs,
        })?;
        let actor = Actor::student(row.account.id);
        service.update_student_profile(
            &actor,
            StudentProfileUpdate {
                phone_number: None,
                cgpa: Some(seed.cgpa),
                branch: seed.branch,
                graduation_year: Some(as_of.year()),
                backlogs: seed.backlogs,
                skills: seed.skills.iter().map(|skill| skill.to_string()).collect(),
                linkedin_url: None,
                github_url: None,
            },
        )?;
        students.push((seed.username, actor));
    }
    println!("- {} students registered", students.len());

    println!("\nApplications");
    let mut backend_applications = Vec::new();
    for (username, student) in &students {
        let listings = service.job_listings(student, &ListingFilter::default())?;
        for listing in &listings.eligible {
            let application = service.apply(student, listing.job.id)?;
            println!(
                "  - {username} applied to {} ({})",
                listing.job.details.title, listing.company_name
            );
            if listing.job.id == backend.id {
                backend_applications.push(application.id);
            }
        }
        for listing in &listings.ineligible {
            if let Some(reason) = &listing.ineligibility {
                println!(
                    "  - {username} cannot apply to {}: {}",
                    listing.job.details.title,
                    reason.summary()
                );
            }
        }
    }

    let review = service.review_applications(
        &northwind,
        backend.id,
        ReviewAction::Shortlist,
        &backend_applications,
    )?;
    println!("\nNorthwind shortlisted {} applicants", review.updated.len());

    let schedule = service.schedule_interviews(
        &northwind,
        backend.id,
        InterviewPlan {
            interview_date: as_of + Duration::days(7),
            interview_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap_or(NaiveTime::MIN),
            round_name: "Technical Interview".to_string(),
            mode: InterviewMode::Online,
            venue_or_link: "https://meet.example.com/northwind-backend".to_string(),
            additional_instructions: "Keep your resume handy".to_string(),
        },
    )?;
    println!("Scheduled {} interviews", schedule.scheduled.len());

    if let Some(first) = backend_applications.first() {
        let offer = service.extend_offer(&northwind, backend.id, *first)?;
        println!(
            "Offer extended on application {}; {} other open applications withdrawn",
            offer.application.id,
            offer.withdrawn.len()
        );
    }

    let dashboard = service.admin_dashboard(&admin)?;
    println!("\nPlacement cell dashboard");
    println!(
        "- {} students | {} placed | {} unplaced",
        dashboard.total_students, dashboard.placed_students, dashboard.unplaced_students
    );
    println!(
        "- {} companies | {} jobs awaiting review",
        dashboard.total_companies, dashboard.pending_jobs
    );

    let company_dashboard = service.company_dashboard(&voltline)?;
    println!(
        "\nVoltline: {} live jobs, {} applications ({} for {})",
        company_dashboard.total_jobs_posted,
        company_dashboard.total_applications,
        service.applicants(&voltline, grid.id)?.len(),
        grid.details.title
    );

    for (username, student) in students.iter().take(2) {
        let summary = service.student_dashboard(student)?;
        println!(
            "{username}: {} applications, {} upcoming interviews, profile {}% complete, {}",
            summary.applied_jobs,
            summary.upcoming_interview_count,
            summary.profile_completion_pct,
            summary.placement_status
        );
    }

    let analytics = service.analytics(&admin)?;
    println!("\nBranch placement");
    for stat in &analytics.branches {
        println!("  - {}: {}/{} placed", stat.branch_label, stat.placed, stat.total);
    }
    println!("Application pipeline");
    for entry in &analytics.status_distribution {
        println!("  - {}: {}", entry.label, entry.count);
    }
    println!(
        "Overall placement rate: {:.2}%",
        analytics.totals.placement_percentage
    );

    Ok(())
}
