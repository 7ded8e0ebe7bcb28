//! CLI for invoice amount reconciliation and spreadsheet grouping.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, group, reconcile};

/// tally - Fill shipment costs from invoices and group spreadsheet rows
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group rows by a reference column, with optional subtotals
    Group(group::GroupArgs),

    /// Fill amounts in a workbook from invoice PDFs
    Reconcile(reconcile::ReconcileArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Group(args) => group::run(args, cli.config.as_deref()).await,
        Commands::Reconcile(args) => reconcile::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    }
}
