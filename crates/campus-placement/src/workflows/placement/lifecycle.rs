//! Status transition rules for applications.
//!
//! `Offered` and `Rejected` are terminal. `Rejected` is reachable from every
//! other state; everything else only moves forward through
//! Applied, Shortlisted, Interview, Offered.

use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId, ApplicationStatus};
use super::validation::ValidationError;

impl ApplicationStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Offered | Self::Rejected)
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Applied => 0,
            Self::Shortlisted => 1,
            Self::Interview => 2,
            Self::Offered => 3,
            Self::Rejected => 4,
        }
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Rejected => true,
            _ => next.rank() > self.rank(),
        }
    }
}

/// Moves `application` to `next`, leaving it untouched when the rules refuse.
pub fn transition(
    application: &mut Application,
    next: ApplicationStatus,
) -> Result<(), ValidationError> {
    if !application.status.can_transition_to(next) {
        return Err(ValidationError::InvalidTransition {
            application_id: application.id,
            from: application.status,
            to: next,
        });
    }
    application.status = next;
    Ok(())
}

/// Company decisions on submitted applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Shortlist,
    Reject,
}

impl ReviewAction {
    pub const fn target(self) -> ApplicationStatus {
        match self {
            Self::Shortlist => ApplicationStatus::Shortlisted,
            Self::Reject => ApplicationStatus::Rejected,
        }
    }
}

/// Other applications of the student that an offer on `offered` auto-withdraws.
pub fn withdrawn_by_offer(
    student_applications: &[Application],
    offered: ApplicationId,
) -> Vec<ApplicationId> {
    student_applications
        .iter()
        .filter(|application| application.id != offered && !application.status.is_terminal())
        .map(|application| application.id)
        .collect()
}
