mod approvals;
mod common;
mod eligibility;
mod lifecycle;
mod routing;
