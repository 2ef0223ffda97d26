use crate::demo::{run_demo, run_evaluate, run_profiles, DemoArgs, EvaluateArgs};
use crate::server;
use candidate_engine::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Candidate Screening Engine",
    about = "Run and exercise the hybrid candidate screening engine from the command line",
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
    /// Screen one candidate against one job and print the JSON result
    Evaluate(EvaluateArgs),
    /// Print the active weight profiles and decision thresholds
    Profiles,
    /// Screen a built-in GCC logistics shortlist and print a recruiter summary
    Demo(DemoArgs),
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Profiles => run_profiles(),
        Command::Demo(args) => run_demo(args),
    }
}
