use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::load_settings;
use core_types::{OutputFormat, Report};
use indicatif::{ProgressBar, ProgressStyle};
use saw_client::{AnalysisExporter, HttpSawClient, Session};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the obiex export client.
fn main() -> anyhow::Result<()> {
    // Load environment variables (credentials, usually) from an optional .env file.
    let _ = dotenvy::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Export(args) => handle_export(args)?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Export analyses from an Oracle BI server to local files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one or more catalog analyses.
    Export(ExportArgs),
}

#[derive(Parser)]
struct ExportArgs {
    /// Catalog path of an analysis to export (repeatable).
    #[arg(long = "report", required = true)]
    reports: Vec<String>,

    /// Output format: csv, pdf, excel2007, mhtml or xml.
    #[arg(long)]
    format: String,

    /// Destination folder; overrides [export].output_folder from obiex.toml.
    #[arg(long)]
    output_folder: Option<PathBuf>,

    /// File name override; only allowed with a single --report.
    #[arg(long)]
    name: Option<String>,

    /// Ask the server to re-run the analyses instead of serving cached results.
    #[arg(long)]
    refresh: bool,
}

// ==============================================================================
// Export Command Logic
// ==============================================================================

/// Handles the orchestration of the export run: one session, then the reports
/// exported one at a time. The session token is not safe to share, so there is
/// no fan-out here.
fn handle_export(args: ExportArgs) -> anyhow::Result<()> {
    // An unrecognized format string fails here, before any remote call.
    let format: OutputFormat = args.format.parse()?;

    if args.name.is_some() && args.reports.len() > 1 {
        anyhow::bail!("--name cannot be combined with multiple --report values");
    }

    let settings = load_settings().context("failed to load configuration")?;
    let output_folder = args
        .output_folder
        .or_else(|| settings.export.output_folder.clone())
        .context("no output folder configured; pass --output-folder or set [export].output_folder")?;

    let client = HttpSawClient::connect_with_timeout(
        &settings.server.wsdl_url,
        Duration::from_secs(settings.server.http_timeout_secs),
    )
    .context("failed to connect to the SAW service")?;

    let session = Session::logon(
        &client,
        &settings.credentials.username,
        &settings.credentials.password,
    )?;
    let exporter = AnalysisExporter::with_timeouts(
        &client,
        Duration::from_secs(settings.export.completion_timeout_secs),
        Duration::from_secs(settings.export.poll_interval_secs),
    );

    // Set up the progress bar
    let progress = ProgressBar::new(args.reports.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    for path in &args.reports {
        progress.set_message(format!("Exporting {path}..."));

        let mut report = Report::new(path.as_str(), format)?.with_output_folder(&output_folder);
        if let Some(name) = &args.name {
            report = report.with_custom_name(name.as_str());
        }
        if args.refresh {
            report = report.with_refresh(true);
        }

        let saved = exporter
            .export_and_save(&session, &report)
            .with_context(|| format!("export of '{path}' failed"))?;
        progress.inc(1);
        progress.set_message(format!("Wrote {}", saved.display()));
    }

    progress.finish_with_message("Export complete");
    Ok(())
}
