use super::common::*;

use crate::workflows::placement::domain::Branch;
use crate::workflows::placement::repository::{PlacementReader, PlacementStore};
use crate::workflows::placement::service::{ListingFilter, PlacementServiceError};
use crate::workflows::placement::validation::ValidationError;

#[test]
fn approving_a_company_is_idempotent_and_audited() {
    let (service, store) = build_service();
    let admin = create_admin(&service);
    let company = register_company(&service, "Initech");

    let pending = service.pending_companies(&admin).expect("loads");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].name, "Initech");

    let approved = service
        .approve_company(&admin, company.account_id)
        .expect("approved");
    assert!(approved.is_approved);
    service
        .approve_company(&admin, company.account_id)
        .expect("approving again is harmless");

    assert!(service.pending_companies(&admin).expect("loads").is_empty());
    let log = store.read(|reader| reader.audit_log()).expect("readable");
    let approvals = log
        .iter()
        .filter(|entry| entry.action == "Company approved: Initech")
        .count();
    assert_eq!(approvals, 2);
    assert!(log
        .iter()
        .all(|entry| entry.recorded_at == now()));
}

#[test]
fn jobs_of_unapproved_companies_cannot_be_approved() {
    let (service, _) = build_service();
    let admin = create_admin(&service);
    let company = register_company(&service, "Initech");
    let job = service
        .post_job(&company, job_details("Support Engineer", None, None, "CSE"))
        .expect("posting is allowed before approval");

    assert!(matches!(
        service.approve_job(&admin, job.id),
        Err(PlacementServiceError::Validation(
            ValidationError::CompanyNotApproved { company_id }
        )) if company_id == company.account_id
    ));
    assert!(
        service.pending_jobs(&admin).expect("loads").is_empty(),
        "the review queue only holds jobs of approved companies"
    );

    service
        .approve_company(&admin, company.account_id)
        .expect("approved");
    assert_eq!(service.pending_jobs(&admin).expect("loads").len(), 1);
    let approved = service.approve_job(&admin, job.id).expect("approved");
    assert!(approved.is_approved);
    assert!(service.pending_jobs(&admin).expect("loads").is_empty());
}

#[test]
fn approved_job_becomes_visible_to_students() {
    let (service, _) = build_service();
    let admin = create_admin(&service);
    let company = approved_company(&service, &admin, "Initech");
    let student = register_student(&service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let job = service
        .post_job(&company, job_details("Support Engineer", None, None, "CSE"))
        .expect("posted");

    let listings = service
        .job_listings(&student, &ListingFilter::default())
        .expect("loads");
    assert!(listings.eligible.is_empty());
    assert!(matches!(
        service.job_detail(&student, job.id),
        Err(PlacementServiceError::NotFound { entity: "job", .. })
    ));

    service.approve_job(&admin, job.id).expect("approved");
    let listings = service
        .job_listings(&student, &ListingFilter::default())
        .expect("loads");
    assert_eq!(listings.eligible.len(), 1);
    assert_eq!(listings.eligible[0].company_name, "Initech");
}

#[test]
fn rejecting_a_pending_job_deletes_it() {
    let (service, store) = build_service();
    let admin = create_admin(&service);
    let company = approved_company(&service, &admin, "Initech");
    let job = service
        .post_job(&company, job_details("Support Engineer", None, None, "CSE"))
        .expect("posted");

    service.reject_job(&admin, job.id).expect("rejected");
    assert!(store
        .read(|reader| reader.job(job.id))
        .expect("readable")
        .is_none());
    assert!(matches!(
        service.approve_job(&admin, job.id),
        Err(PlacementServiceError::NotFound { entity: "job", .. })
    ));

    let log = store.read(|reader| reader.audit_log()).expect("readable");
    assert_eq!(
        log.last().map(|entry| entry.action.as_str()),
        Some("Job rejected: Support Engineer (Initech)")
    );
}

#[test]
fn approved_jobs_cannot_be_rejected() {
    let (campus, store) = campus();
    assert!(matches!(
        campus.service.reject_job(&campus.admin, campus.job.id),
        Err(PlacementServiceError::Validation(
            ValidationError::JobAlreadyApproved { job_id }
        )) if job_id == campus.job.id
    ));
    assert!(store
        .read(|reader| reader.job(campus.job.id))
        .expect("readable")
        .is_some());
}

#[test]
fn pending_jobs_are_newest_first() {
    let (campus, _) = campus();
    let first = campus
        .service
        .post_job(&campus.company, job_details("Data Analyst", None, None, "CSE"))
        .expect("posted");
    let second = campus
        .service
        .post_job(&campus.company, job_details("QA Engineer", None, None, "ECE"))
        .expect("posted");

    let pending = campus.service.pending_jobs(&campus.admin).expect("loads");
    let ids: Vec<_> = pending.iter().map(|job| job.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let dashboard = campus.service.admin_dashboard(&campus.admin).expect("loads");
    assert_eq!(dashboard.pending_jobs, 2);
}

#[test]
fn approvals_require_an_administrator() {
    let (campus, _) = campus();
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, None, 0);

    assert!(matches!(
        campus.service.approve_company(&campus.company, campus.company.account_id),
        Err(PlacementServiceError::Access(_))
    ));
    assert!(matches!(
        campus.service.approve_job(&student, campus.job.id),
        Err(PlacementServiceError::Access(_))
    ));
    assert!(matches!(
        campus.service.pending_jobs(&campus.company),
        Err(PlacementServiceError::Access(_))
    ));
}
