use crate::infra::{actor_for_username, ConfiguredStore};
use campus_placement::config::AppConfig;
use campus_placement::error::AppError;
use campus_placement::workflows::placement::{
    AdminRegistration, PlacementService, StudentExportFilter,
};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CreateAdminArgs {
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, default_value = "")]
    pub(crate) first_name: String,
    #[arg(long, default_value = "")]
    pub(crate) last_name: String,
}

#[derive(Args, Debug)]
pub(crate) struct ExportStudentsArgs {
    /// Administrator username the export runs as
    #[arg(long)]
    pub(crate) admin: String,
    /// Keep students whose branch code or name contains this text
    #[arg(long)]
    pub(crate) branch: Option<String>,
    /// `placed` or `unplaced`
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportJobsArgs {
    /// Administrator username the export runs as
    #[arg(long)]
    pub(crate) admin: String,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportStudentsArgs {
    /// Administrator username the import runs as
    #[arg(long)]
    pub(crate) admin: String,
    /// CSV with a `username,password,email,first_name,last_name,branch,cgpa,backlogs` header
    #[arg(long)]
    pub(crate) file: PathBuf,
}

fn configured_service() -> Result<PlacementService<ConfiguredStore>, AppError> {
    let config = AppConfig::load()?;
    let store = ConfiguredStore::open(&config.storage)?;
    Ok(PlacementService::new(Arc::new(store), config.reporting))
}

fn write_report(bytes: &[u8], output: Option<&Path>) -> Result<(), AppError> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes)?;
            println!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub(crate) fn run_create_admin(args: CreateAdminArgs) -> Result<(), AppError> {
    let service = configured_service()?;
    create_admin(&service, args)
}

fn create_admin(
    service: &PlacementService<ConfiguredStore>,
    args: CreateAdminArgs,
) -> Result<(), AppError> {
    let account = service.create_admin(AdminRegistration {
        username: args.username,
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
    })?;
    println!(
        "Created administrator {} (account {})",
        account.username, account.id
    );
    Ok(())
}

pub(crate) fn run_export_students(args: ExportStudentsArgs) -> Result<(), AppError> {
    let service = configured_service()?;
    let actor = actor_for_username(&service, &args.admin)?;
    let filter = StudentExportFilter {
        branch: args.branch,
        status: args.status,
    };
    let bytes = service.export_students(&actor, &filter)?;
    write_report(&bytes, args.output.as_deref())
}

pub(crate) fn run_export_jobs(args: ExportJobsArgs) -> Result<(), AppError> {
    let service = configured_service()?;
    let actor = actor_for_username(&service, &args.admin)?;
    let bytes = service.export_jobs(&actor)?;
    write_report(&bytes, args.output.as_deref())
}

pub(crate) fn run_import_students(args: ImportStudentsArgs) -> Result<(), AppError> {
    let service = configured_service()?;
    import_students(&service, &args.admin, &args.file)
}

fn import_students(
    service: &PlacementService<ConfiguredStore>,
    admin: &str,
    file: &Path,
) -> Result<(), AppError> {
    let actor = actor_for_username(service, admin)?;
    let source = std::fs::File::open(file)?;
    let summary = service.import_students(&actor, std::io::BufReader::new(source))?;
    println!("Imported {} students:", summary.created);
    for username in &summary.usernames {
        println!("  - {username}");
    }
    Ok(())
}
