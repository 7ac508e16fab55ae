use crate::demo::{run_demo, run_monthly, DemoArgs, MonthlyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use team_kpi::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Team KPI Service",
    about = "Score weekly KPI reports and roll them up into monthly summaries",
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
    /// Score a seeded demo team for two weeks and print the results
    Demo(DemoArgs),
    /// Print (and optionally export) a monthly summary for the demo team
    Monthly(MonthlyArgs),
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
        Command::Monthly(args) => run_monthly(args),
    }
}
