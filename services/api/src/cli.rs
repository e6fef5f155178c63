use crate::report::{run_import, run_report, ImportArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hiretrack::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "HireTrack",
    about = "Track job applications through Applied, Interview, Offer, and Rejected",
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
    /// Inspect or load the application store from the command line
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum JobsCommand {
    /// Print pipeline totals and the filtered application list
    Report(ReportArgs),
    /// Bulk-create applications from a CSV export
    Import(ImportArgs),
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
        Command::Jobs {
            command: JobsCommand::Report(args),
        } => run_report(args).await,
        Command::Jobs {
            command: JobsCommand::Import(args),
        } => run_import(args).await,
    }
}
