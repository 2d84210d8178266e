use super::common::*;

use crate::workflows::placement::domain::{AllowedBranches, Branch};
use crate::workflows::placement::eligibility::{
    evaluate, Eligibility, EligibilityCriteria, IneligibilityReason, StudentStanding,
};
use crate::workflows::placement::service::ListingFilter;

fn standing(cgpa: Option<f32>, backlogs: u32, branch: Branch) -> StudentStanding {
    StudentStanding {
        cgpa,
        backlogs,
        branch,
    }
}

fn criteria(min_cgpa: Option<f32>, max_backlogs: Option<u32>, branches: &str) -> EligibilityCriteria {
    EligibilityCriteria {
        min_cgpa,
        max_backlogs,
        allowed_branches: AllowedBranches::parse(branches).expect("valid branch codes"),
    }
}

#[test]
fn student_meeting_every_requirement_is_eligible() {
    let verdict = evaluate(
        &standing(Some(7.2), 0, Branch::ComputerScience),
        &criteria(Some(7.0), Some(1), "CSE,ECE"),
    );
    assert_eq!(verdict, Eligibility::Eligible);
}

#[test]
fn boundaries_are_inclusive() {
    let verdict = evaluate(
        &standing(Some(7.0), 1, Branch::ElectronicsCommunication),
        &criteria(Some(7.0), Some(1), "CSE,ECE"),
    );
    assert!(verdict.is_eligible());
}

#[test]
fn low_cgpa_is_reported_before_other_failures() {
    let verdict = evaluate(
        &standing(Some(6.5), 4, Branch::Civil),
        &criteria(Some(7.0), Some(1), "CSE"),
    );
    assert_eq!(
        verdict,
        Eligibility::NotEligible(IneligibilityReason::CgpaBelowMinimum {
            required: 7.0,
            actual: 6.5,
        })
    );
}

#[test]
fn missing_cgpa_fails_only_when_a_minimum_exists() {
    let with_minimum = evaluate(
        &standing(None, 0, Branch::ComputerScience),
        &criteria(Some(6.0), None, "CSE"),
    );
    assert_eq!(
        with_minimum.reason(),
        Some(&IneligibilityReason::MissingCgpa { required: 6.0 })
    );

    let without_minimum = evaluate(
        &standing(None, 0, Branch::ComputerScience),
        &criteria(None, None, "CSE"),
    );
    assert!(without_minimum.is_eligible());
}

#[test]
fn backlogs_over_the_limit_are_rejected() {
    let verdict = evaluate(
        &standing(Some(8.0), 2, Branch::ComputerScience),
        &criteria(Some(7.0), Some(1), "CSE"),
    );
    assert_eq!(
        verdict.reason(),
        Some(&IneligibilityReason::TooManyBacklogs {
            allowed: 1,
            actual: 2,
        })
    );
}

#[test]
fn absent_backlog_limit_is_unconstrained() {
    let verdict = evaluate(
        &standing(Some(8.0), 9, Branch::ComputerScience),
        &criteria(None, None, "CSE"),
    );
    assert!(verdict.is_eligible());
}

#[test]
fn branch_outside_the_allowed_set_is_rejected() {
    let verdict = evaluate(
        &standing(Some(9.1), 0, Branch::Mechanical),
        &criteria(Some(7.0), Some(0), "CSE,ECE"),
    );
    match verdict {
        Eligibility::NotEligible(IneligibilityReason::BranchNotAllowed { branch, allowed }) => {
            assert_eq!(branch, Branch::Mechanical);
            assert_eq!(allowed.to_string(), "CSE,ECE");
        }
        other => panic!("expected branch rejection, got {:?}", other),
    }
}

#[test]
fn ineligibility_summary_names_the_branch() {
    let verdict = evaluate(
        &standing(Some(9.1), 0, Branch::Mechanical),
        &criteria(None, None, "CSE"),
    );
    assert_eq!(
        verdict.summary(),
        "branch ME is not among the allowed branches (CSE)"
    );
}

#[test]
fn listing_and_application_agree_on_eligibility() {
    let (campus, _) = campus();
    let eligible = register_student(&campus.service, "asha", Branch::ComputerScience, Some(7.2), 0);
    let ineligible = register_student(&campus.service, "ravi", Branch::ComputerScience, Some(6.4), 0);

    let listings = campus
        .service
        .job_listings(&eligible, &ListingFilter::default())
        .expect("listings load");
    assert_eq!(listings.eligible.len(), 1);
    assert!(listings.ineligible.is_empty());
    assert!(campus.service.apply(&eligible, campus.job.id).is_ok());

    let listings = campus
        .service
        .job_listings(&ineligible, &ListingFilter::default())
        .expect("listings load");
    assert!(listings.eligible.is_empty());
    assert_eq!(listings.ineligible.len(), 1);
    assert_eq!(
        listings.ineligible[0].ineligibility,
        Some(IneligibilityReason::CgpaBelowMinimum {
            required: 7.0,
            actual: 6.4,
        })
    );
    assert!(campus.service.apply(&ineligible, campus.job.id).is_err());

    let detail = campus
        .service
        .job_detail(&ineligible, campus.job.id)
        .expect("detail loads");
    assert!(!detail.eligibility.is_eligible());
}
