//! CSV reports for the placement cell.

use std::io::Write;

use super::report::{AdminJobView, StudentRow};

pub const STUDENT_REPORT_HEADER: [&str; 8] = [
    "Username",
    "First Name",
    "Last Name",
    "Email",
    "Branch",
    "CGPA",
    "Backlogs",
    "Placed Status",
];

pub const JOB_REPORT_HEADER: [&str; 7] = [
    "Job Title",
    "Company",
    "Location",
    "Salary Range",
    "Deadline",
    "Status",
    "Applicant Count",
];

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "failed to write report: {}", err),
            ExportError::Csv(err) => write!(f, "failed to encode report as CSV: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub fn write_students<W: Write>(out: W, rows: &[StudentRow]) -> Result<W, ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(STUDENT_REPORT_HEADER)?;

    for row in rows {
        let cgpa = row
            .profile
            .cgpa
            .map(|cgpa| format!("{:.2}", cgpa))
            .unwrap_or_default();
        writer.write_record([
            row.account.username.as_str(),
            row.account.first_name.as_str(),
            row.account.last_name.as_str(),
            row.account.email.as_str(),
            row.profile.branch.label(),
            cgpa.as_str(),
            row.profile.backlogs.to_string().as_str(),
            row.profile.placement_label(),
        ])?;
    }

    finish(writer)
}

pub fn write_jobs<W: Write>(out: W, rows: &[AdminJobView]) -> Result<W, ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(JOB_REPORT_HEADER)?;

    for row in rows {
        let details = &row.job.details;
        writer.write_record([
            details.title.as_str(),
            row.company_name.as_str(),
            details.location.as_str(),
            details.salary_range.as_str(),
            details
                .application_deadline
                .format("%Y-%m-%d")
                .to_string()
                .as_str(),
            row.status.label(),
            row.applicant_count.to_string().as_str(),
        ])?;
    }

    finish(writer)
}

fn finish<W: Write>(writer: csv::Writer<W>) -> Result<W, ExportError> {
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}
