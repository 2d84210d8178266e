use super::criteria::{EligibilityCriteria, StudentStanding};
use super::verdict::IneligibilityReason;

pub(crate) fn check_cgpa(
    standing: &StudentStanding,
    criteria: &EligibilityCriteria,
) -> Result<(), IneligibilityReason> {
    let Some(required) = criteria.min_cgpa else {
        return Ok(());
    };

    match standing.cgpa {
        None => Err(IneligibilityReason::MissingCgpa { required }),
        Some(actual) if actual < required => {
            Err(IneligibilityReason::CgpaBelowMinimum { required, actual })
        }
        Some(_) => Ok(()),
    }
}

pub(crate) fn check_backlogs(
    standing: &StudentStanding,
    criteria: &EligibilityCriteria,
) -> Result<(), IneligibilityReason> {
    match criteria.max_backlogs {
        Some(allowed) if standing.backlogs > allowed => Err(IneligibilityReason::TooManyBacklogs {
            allowed,
            actual: standing.backlogs,
        }),
        _ => Ok(()),
    }
}

pub(crate) fn check_branch(
    standing: &StudentStanding,
    criteria: &EligibilityCriteria,
) -> Result<(), IneligibilityReason> {
    if criteria.allowed_branches.is_empty() || criteria.allowed_branches.contains(standing.branch) {
        return Ok(());
    }

    Err(IneligibilityReason::BranchNotAllowed {
        branch: standing.branch,
        allowed: criteria.allowed_branches.clone(),
    })
}
