use crate::check::{run_catalog, run_check, CatalogList, CheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use parcel_form::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Parcel Form",
    about = "Serve the shipment form or check entries against the delivery catalog",
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
    /// Validate a tracking number and weight and show the matching delivery options
    Check(CheckArgs),
    /// Print the unfiltered delivery catalog
    Catalog {
        #[command(subcommand)]
        list: CatalogList,
    },
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
        Command::Check(args) => run_check(args).await,
        Command::Catalog { list } => run_catalog(list).await,
    }
}
