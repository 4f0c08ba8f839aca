use crate::demo::{run_demo, DemoArgs};
use crate::score::{run_daily_score, run_week_score, DailyScoreArgs, WeekScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sadhana::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Sadhana Scoring",
    about = "Score daily sadhana logs and serve weekly progress over HTTP",
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
    /// Score entries from files without starting the service
    Score {
        #[command(subcommand)]
        command: ScoreCommand,
    },
    /// Score a synthetic week for two devotees and print the reports
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScoreCommand {
    /// Score one daily entry read from a JSON file
    Daily(DailyScoreArgs),
    /// Aggregate the week containing an anchor date from a JSON or CSV file
    Week(WeekScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON array of user profiles to preload
    #[arg(long)]
    pub(crate) profiles: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score {
            command: ScoreCommand::Daily(args),
        } => run_daily_score(args),
        Command::Score {
            command: ScoreCommand::Week(args),
        } => run_week_score(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
