use serde::{Deserialize, Serialize};

use crate::workflows::placement::domain::{
    AllowedBranches, Branch, JobDetails, JobPosting, StudentProfile,
};

/// The slice of a student record the evaluator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudentStanding {
    pub cgpa: Option<f32>,
    pub backlogs: u32,
    pub branch: Branch,
}

impl From<&StudentProfile> for StudentStanding {
    fn from(profile: &StudentProfile) -> Self {
        Self {
            cgpa: profile.cgpa,
            backlogs: profile.backlogs,
            branch: profile.branch,
        }
    }
}

/// Job requirements. `None` or an empty branch set leaves that dimension open.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    pub min_cgpa: Option<f32>,
    pub max_backlogs: Option<u32>,
    pub allowed_branches: AllowedBranches,
}

impl From<&JobDetails> for EligibilityCriteria {
    fn from(details: &JobDetails) -> Self {
        Self {
            min_cgpa: details.min_cgpa,
            max_backlogs: details.max_backlogs,
            allowed_branches: details.allowed_branches.clone(),
        }
    }
}

impl From<&JobPosting> for EligibilityCriteria {
    fn from(job: &JobPosting) -> Self {
        Self::from(&job.details)
    }
}
