use crate::demo::{
    run_demo, run_inspection_export, run_inspection_report, DemoArgs, ExportArgs, ReportArgs,
};
use crate::server;
use boiler_inspection::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Boiler Inspection Service",
    about = "Record boiler inspections and produce inspection reports",
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
    /// Work with inspection records offline
    Inspection {
        #[command(subcommand)]
        command: InspectionCommand,
    },
    /// Walk through one inspection from draft to printed report
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum InspectionCommand {
    /// Validate a submission JSON file and render its report
    Report(ReportArgs),
    /// Export a JSON-file store as a CSV register
    Export(ExportArgs),
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
        Command::Inspection {
            command: InspectionCommand::Report(args),
        } => run_inspection_report(args),
        Command::Inspection {
            command: InspectionCommand::Export(args),
        } => run_inspection_export(args),
        Command::Demo(args) => run_demo(args),
    }
}
