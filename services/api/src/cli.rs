use crate::report::{run_analyze, run_next_id, AnalyzeArgs, NextIdArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruit_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruit AI",
    about = "Score, rank and audit data science candidates from the command line",
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
    /// Run one analysis over the merged candidate pool and print the result
    Analyze(AnalyzeArgs),
    /// Print the id the next submitted candidate would receive
    NextId(NextIdArgs),
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

    // The remote source uses a blocking HTTP client.
    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => tokio::task::spawn_blocking(move || run_analyze(args)).await?,
        Command::NextId(args) => tokio::task::spawn_blocking(move || run_next_id(args)).await?,
    }
}
