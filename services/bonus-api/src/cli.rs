use crate::commands::{check_rules, evaluate_once, CheckRulesArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loyalty_bonus::bonus::RefreshPolicy;
use loyalty_bonus::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Loyalty Bonus Service",
    about = "Serve and exercise the loyalty bonus rule engine from the command line",
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
    /// Calculate the bonus for a single transaction and print it as JSON
    Evaluate(EvaluateArgs),
    /// Validate a rule file and print the evaluation order
    CheckRules(CheckRulesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured rule file
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Override when rules are re-read (per_evaluation or startup)
    #[arg(long)]
    pub(crate) refresh: Option<RefreshPolicy>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => evaluate_once(args).await,
        Command::CheckRules(args) => check_rules(args),
    }
}
