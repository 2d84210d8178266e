//! Campus placement workflows: students apply to approved jobs, companies move
//! applications through shortlisting, interviews and offers, and the placement
//! cell approves postings and watches the numbers.
//!
//! [`PlacementService`] is the entry point. It is generic over a
//! [`PlacementStore`] so the same workflows run against the in-memory store in
//! tests and against SQLite in the service binary.

pub mod access;
pub mod domain;
pub mod eligibility;
pub mod export;
pub mod import;
pub mod lifecycle;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use access::{authorize, AccessError, Actor};
pub use domain::{
    Account, AccountId, AllowedBranches, Application, ApplicationId, ApplicationStatus,
    AuditLogEntry, Branch, CompanyProfile, Document, DocumentId, InterviewId, InterviewMode,
    InterviewPlan, InterviewSchedule, JobDetails, JobId, JobListingStatus, JobPosting,
    ParseEnumError, Role, StudentProfile,
};
pub use eligibility::{
    evaluate, Eligibility, EligibilityCriteria, IneligibilityReason, StudentStanding,
};
pub use export::ExportError;
pub use import::ImportError;
pub use lifecycle::{transition, ReviewAction};
pub use report::{
    AdminDashboard, CompanyDashboard, ImportSummary, Page, PlacementAnalytics, StudentDashboard,
};
pub use repository::{
    InMemoryPlacementStore, PlacementReader, PlacementStore, PlacementTx, RepositoryError,
    SqlitePlacementStore,
};
pub use router::{placement_router, ACCOUNT_HEADER};
pub use service::{
    Clock, FixedClock, InterviewFilter, JobFilter, ListingFilter, PlacementService,
    PlacementServiceError, StudentExportFilter, SystemClock,
};
pub use validation::{
    AccountUpdate, AdminRegistration, CompanyProfileUpdate, CompanyRegistration, DocumentUpload,
    StudentProfileUpdate, StudentRegistration, ValidationError,
};
