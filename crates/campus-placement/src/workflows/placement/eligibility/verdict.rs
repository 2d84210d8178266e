use serde::{Deserialize, Serialize};

use crate::workflows::placement::domain::{AllowedBranches, Branch};

/// Outcome of matching a student against a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    NotEligible(IneligibilityReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn reason(&self) -> Option<&IneligibilityReason> {
        match self {
            Eligibility::Eligible => None,
            Eligibility::NotEligible(reason) => Some(reason),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Eligibility::Eligible => "eligible".to_string(),
            Eligibility::NotEligible(reason) => reason.summary(),
        }
    }
}

/// First failing requirement, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IneligibilityReason {
    MissingCgpa { required: f32 },
    CgpaBelowMinimum { required: f32, actual: f32 },
    TooManyBacklogs { allowed: u32, actual: u32 },
    BranchNotAllowed {
        branch: Branch,
        allowed: AllowedBranches,
    },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::MissingCgpa { required } => {
                format!("a CGPA of at least {required:.2} is required but none is on record")
            }
            IneligibilityReason::CgpaBelowMinimum { required, actual } => {
                format!("CGPA {actual:.2} is below the required {required:.2}")
            }
            IneligibilityReason::TooManyBacklogs { allowed, actual } => {
                format!("{actual} backlog(s) exceed the allowed {allowed}")
            }
            IneligibilityReason::BranchNotAllowed { branch, allowed } => {
                format!("branch {branch} is not among the allowed branches ({allowed})")
            }
        }
    }
}

impl std::fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}
