//! Reconcile command - fill shipment amounts in a workbook from invoice PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use tally_core::pdf::extract_document_text;
use tally_core::{reconcile_text, Document, MergeUpdate, PdfExtractor};

use super::config::load_config;

/// Arguments for the reconcile command.
#[derive(Args)]
pub struct ReconcileArgs {
    /// Workbook listing shipment identifiers (.xlsx)
    #[arg(required = true)]
    workbook: PathBuf,

    /// Invoice PDFs or glob patterns; earlier files take precedence
    #[arg(required = true)]
    pdfs: Vec<String>,

    /// Output file
    #[arg(short, long, default_value = "updated_excel.xlsx")]
    output: PathBuf,

    /// Also write the matched identifiers and amounts as CSV
    #[arg(long)]
    report: Option<PathBuf>,

    /// Do not append the shipping cost header columns
    #[arg(long)]
    plain: bool,
}

pub async fn run(args: ReconcileArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.plain {
        config.reconcile.appended_headers.clear();
    }

    if !args.workbook.exists() {
        anyhow::bail!("Workbook not found: {}", args.workbook.display());
    }

    let files = expand_inputs(&args.pdfs)?;
    info!("Reconciling {} against {} PDF files", args.workbook.display(), files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} PDFs")?
            .progress_chars("=>-"),
    );

    let texts = extract_texts(&files, &pb).await?;
    pb.finish_and_clear();

    let workbook = fs::read(&args.workbook)?;
    let document = Document::concat(&texts);
    debug!("Combined document has {} lines", document.len());

    let output = reconcile_text(&workbook, &document, &config)
        .with_context(|| format!("Failed to process {}", args.workbook.display()))?;

    fs::write(&args.output, &output.workbook)?;

    if let Some(report_path) = &args.report {
        write_report(report_path, &output.updates)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    println!(
        "{} Matched {} identifiers, output written to {}",
        style("✓").green(),
        output.updates.len(),
        args.output.display()
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Expand each argument as a glob pattern, keeping argument order.
fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let matched: Vec<PathBuf> = glob(pattern)?
            .filter_map(|r| r.ok())
            .filter(|p| is_pdf(p))
            .collect();

        if matched.is_empty() {
            anyhow::bail!("No matching PDF files for: {}", pattern);
        }
        files.extend(matched);
    }

    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Extract every PDF on the blocking pool; results come back in input order.
async fn extract_texts(files: &[PathBuf], pb: &ProgressBar) -> anyhow::Result<Vec<String>> {
    let handles: Vec<_> = files
        .iter()
        .cloned()
        .map(|path| {
            tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
                let data = fs::read(&path)?;
                let mut extractor = PdfExtractor::new();
                extract_document_text(&mut extractor, &data)
                    .with_context(|| format!("Invalid or corrupted PDF file: {}", path.display()))
            })
        })
        .collect();

    let mut texts = Vec::with_capacity(handles.len());
    for handle in handles {
        texts.push(handle.await??);
        pb.inc(1);
    }

    Ok(texts)
}

fn write_report(path: &Path, updates: &[MergeUpdate]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["row", "identifier", "amount"])?;

    for update in updates {
        // Spreadsheet row numbers are 1-based
        writer.write_record([
            (update.row + 1).to_string(),
            update.identifier.clone(),
            update.amount.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
