use crate::demo::{run_demo, run_rubric_show, run_score, RubricArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hr_console::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "hr-console",
    about = "Score, review, and export candidate interviews from the command line",
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
    /// Inspect the scoring rubric
    Rubric {
        #[command(subcommand)]
        command: RubricCommand,
    },
    /// Compute totals, percentage, and appreciation for a JSON score sheet
    Score(ScoreArgs),
    /// Run an in-memory interview from creation to validated export
    Demo,
}

#[derive(Subcommand, Debug)]
enum RubricCommand {
    /// Print every criterion with its weight and the derived maxima
    Show(RubricArgs),
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
        Command::Rubric {
            command: RubricCommand::Show(args),
        } => run_rubric_show(args),
        Command::Score(args) => run_score(args),
        Command::Demo => run_demo(),
    }
}
