use crate::report::{run_path, run_score, run_stats, PathArgs, ScoreArgs, StatsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use kinship::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kinship",
    about = "Score relationship health and trace introduction paths from the command line",
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
    /// Score a single relationship from days since last contact
    Score(ScoreArgs),
    /// Find the shortest path (or several paths) between two people in an edge export
    Path(PathArgs),
    /// Summarise the shape of an edge export
    Stats(StatsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Circle placement CSV (`user_id,contact_id,tier`) seeding health refreshes
    #[arg(long)]
    pub(crate) circles: Option<PathBuf>,
    /// Contact list CSV (`user_id,node_id,name[,company,title]`) used by introduction lookups
    #[arg(long)]
    pub(crate) contacts: Option<PathBuf>,
    /// Connection edge CSV shared by every user's network queries
    #[arg(long)]
    pub(crate) edges: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Path(args) => run_path(args),
        Command::Stats(args) => run_stats(args),
    }
}
