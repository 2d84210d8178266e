mod criteria;
mod rules;
mod verdict;

pub use criteria::{EligibilityCriteria, StudentStanding};
pub use verdict::{Eligibility, IneligibilityReason};

/// Gates a student against a job's requirements.
///
/// Checks run CGPA, then backlogs, then branch, and stop at the first failure.
/// Job listings, job detail and application creation all go through here.
pub fn evaluate(standing: &StudentStanding, criteria: &EligibilityCriteria) -> Eligibility {
    let outcome = rules::check_cgpa(standing, criteria)
        .and_then(|()| rules::check_backlogs(standing, criteria))
        .and_then(|()| rules::check_branch(standing, criteria));

    match outcome {
        Ok(()) => Eligibility::Eligible,
        Err(reason) => Eligibility::NotEligible(reason),
    }
}
