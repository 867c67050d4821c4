use crate::commands::{
    run_compare, run_new, run_reconcile, run_score, CompareArgs, NewArgs, ReconcileArgs,
    ScoreArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use appraisal::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Appraisal Checklist Service",
    about = "Score, compare and reconcile RoB 2, ROBINS-I and AMSTAR 2 appraisal checklists",
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
    /// Work with checklist documents stored as JSON files
    Checklist {
        #[command(subcommand)]
        command: ChecklistCommand,
    },
    /// Walk sample checklists of every instrument through scoring and reconciliation
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ChecklistCommand {
    /// Print an empty checklist with every question unanswered
    New(NewArgs),
    /// Score a checklist file
    Score(ScoreArgs),
    /// Compare two reviewers' checklist files
    Compare(CompareArgs),
    /// Build the consensus checklist from two reviewers' files
    Reconcile(ReconcileArgs),
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
        Command::Checklist { command } => match command {
            ChecklistCommand::New(args) => run_new(args),
            ChecklistCommand::Score(args) => run_score(args),
            ChecklistCommand::Compare(args) => run_compare(args),
            ChecklistCommand::Reconcile(args) => run_reconcile(args),
        },
        Command::Demo(args) => run_demo(args),
    }
}
