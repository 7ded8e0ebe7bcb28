//! Group command - insert separators and subtotals into a workbook.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::info;

use tally_core::{group_workbook, GroupRequest};

use super::config::load_config;

/// Arguments for the group command.
#[derive(Args)]
pub struct GroupArgs {
    /// Input workbook (.xlsx)
    #[arg(required = true)]
    input: PathBuf,

    /// Column whose value defines the groups (e.g. F)
    #[arg(short, long)]
    reference: String,

    /// Append a subtotal row after each group
    #[arg(long)]
    totals: bool,

    /// Column to sum for subtotals (e.g. H)
    #[arg(long, requires = "totals")]
    total_column: Option<String>,

    /// Output file
    #[arg(short, long, default_value = "processed_excel.xlsx")]
    output: PathBuf,
}

pub async fn run(args: GroupArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Grouping {} on column {}", args.input.display(), args.reference);

    let data = fs::read(&args.input)?;
    let request = GroupRequest {
        reference_column: args.reference,
        compute_totals: args.totals,
        total_column: args.total_column,
    };

    let output = group_workbook(&data, &request, &config.grouping)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    fs::write(&args.output, output)?;
    println!(
        "{} Output written to {}",
        style("✓").green(),
        args.output.display()
    );

    Ok(())
}
