use crate::demo::{run_decide, run_demo, run_offers, DecideArgs, DemoArgs, OffersArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lendwise::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lendwise Underwriting",
    about = "Run the underwriting decision service or score applications from the command line",
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
    /// Decide a single application read from a JSON file or stdin
    Decide(DecideArgs),
    /// Print the offer menu for a loan amount and score
    Offers(OffersArgs),
    /// Walk through sample verified and manual-entry applications
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
        Command::Decide(args) => run_decide(args),
        Command::Offers(args) => run_offers(args),
        Command::Demo(args) => run_demo(args),
    }
}
