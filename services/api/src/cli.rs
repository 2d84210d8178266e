use crate::admin::{
    run_create_admin, run_export_jobs, run_export_students, run_import_students, CreateAdminArgs,
    ExportJobsArgs, ExportStudentsArgs, ImportStudentsArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use campus_placement::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Campus Placement Portal",
    about = "Run and administer the campus placement portal from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Seed an in-memory portal and walk a placement season end to end
    Demo(DemoArgs),
    /// Create a placement-cell administrator in the configured store
    CreateAdmin(CreateAdminArgs),
    /// Write a CSV report from the configured store
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },
    /// Load records from CSV into the configured store
    Import {
        #[command(subcommand)]
        command: ImportCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
    /// Students with branch, CGPA and placement status
    Students(ExportStudentsArgs),
    /// Every job posting with status and applicant count
    Jobs(ExportJobsArgs),
}

#[derive(Subcommand, Debug)]
enum ImportCommand {
    /// Register every student in the file, or none if any row fails
    Students(ImportStudentsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::CreateAdmin(args) => run_create_admin(args),
        Command::Export {
            command: ExportCommand::Students(args),
        } => run_export_students(args),
        Command::Export {
            command: ExportCommand::Jobs(args),
        } => run_export_jobs(args),
        Command::Import {
            command: ImportCommand::Students(args),
        } => run_import_students(args),
    }
}
