//! clientdash-ctl - scriptable access to the client dashboard
//!
//! This tool provides commands for:
//! - Printing the dashboard figures for the current sheet (or a local CSV)
//! - Asking the chat assistant a single question
//! - Showing resolved configuration
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/clientdash/config.toml (~/.config/clientdash/config.toml)
//! - Logs: $XDG_STATE_HOME/clientdash/clientdash.log (~/.local/state/clientdash/clientdash.log)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clientdash_core::analytics::{DashboardMetrics, StatusBreakdown, StatusShare};
use clientdash_core::chat::{ChatSession, WebhookClient};
use clientdash_core::format::format_currency;
use clientdash_core::{ClientRecord, Config, IngestResult, SheetIngestor, SheetSource};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "clientdash-ctl")]
#[command(about = "Query the client dashboard from the command line")]
#[command(version)]
struct Args {
    /// Write debug logs to the state directory
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print KPIs, status breakdown and the client list
    Summary {
        /// Read the export from a local CSV file instead of the sheet URL
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print a JSON document instead of text
        #[arg(long)]
        json: bool,
    },

    /// Send one message to the chat assistant and print the reply
    Ask {
        /// Message text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Show configuration paths and effective settings
    Config,
}

/// JSON shape of `summary --json`.
#[derive(Serialize)]
struct SummaryReport<'a> {
    source: String,
    fetched_at: DateTime<Utc>,
    rows_seen: usize,
    rows_skipped: usize,
    metrics: &'a DashboardMetrics,
    status_breakdown: &'a [StatusShare],
    clients: &'a [ClientRecord],
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging if verbose
    let _log_guard = if args.verbose {
        Some(
            clientdash_core::logging::init(&config.logging)
                .context("failed to initialize logging")?,
        )
    } else {
        None
    };

    match args.command {
        Command::Summary { file, json } => cmd_summary(&config, file, json),
        Command::Ask { message } => cmd_ask(&config, message.join(" ")),
        Command::Config => cmd_config(&config),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")
}

/// Spinner on stderr while a request is outstanding. Hidden when stderr is
/// not a terminal.
fn spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn cmd_summary(config: &Config, file: Option<PathBuf>, json: bool) -> Result<()> {
    let source = match file {
        Some(path) => SheetSource::File(path),
        None => SheetSource::from_config(&config.sheet).context("invalid [sheet] configuration")?,
    };
    let ingestor = SheetIngestor::new(source);
    let source = ingestor.source().describe();

    let pb = spinner(format!("Fetching {}", source))?;
    let result = runtime()?.block_on(ingestor.ingest());
    pb.finish_and_clear();
    let result = result.context("failed to fetch client sheet")?;

    let metrics = DashboardMetrics::compute(&result.records);
    let breakdown = StatusBreakdown::compute(&result.records);

    if json {
        let report = SummaryReport {
            source,
            fetched_at: result.fetched_at,
            rows_seen: result.rows_seen,
            rows_skipped: result.rows_skipped,
            metrics: &metrics,
            status_breakdown: &breakdown.shares,
            clients: &result.records,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(
        &config.display.currency_symbol,
        &source,
        &result,
        &metrics,
        &breakdown,
    );
    Ok(())
}

fn print_summary(
    symbol: &str,
    source: &str,
    result: &IngestResult,
    metrics: &DashboardMetrics,
    breakdown: &StatusBreakdown,
) {
    println!("Client Summary");
    println!("==============");
    println!();
    println!("Source:          {}", source);
    println!(
        "Rows:            {} ({} skipped)",
        result.rows_seen, result.rows_skipped
    );
    println!();
    println!(
        "Total Revenue:   {}",
        format_currency(symbol, metrics.total_revenue)
    );
    println!("Total Clients:   {}", metrics.total_clients);
    println!("Total Headshots: {}", metrics.total_headshots);
    println!(
        "Completion Rate: {} ({} delivered, {} in progress)",
        metrics.format_completion_rate(),
        metrics.delivered_count,
        metrics.in_progress_count
    );
    println!(
        "Avg Order Value: {}",
        format_currency(symbol, metrics.average_order_value)
    );

    if breakdown.is_empty() {
        return;
    }

    println!();
    println!("Status Breakdown");
    println!("----------------");
    for share in &breakdown.shares {
        println!(
            "  {:<14} {:>4}  {:>6}",
            status_label(&share.status),
            share.count,
            share.format_percentage()
        );
    }

    println!();
    println!("Clients");
    println!("-------");
    println!(
        "  {:<24} {:>6}  {:>14}  {:<14} {}",
        "Name", "Shots", "Price", "Status", "Email"
    );
    for record in &result.records {
        println!(
            "  {:<24} {:>6}  {:>14}  {:<14} {}",
            record.client_name,
            record.headshot_count,
            format_currency(symbol, record.price),
            status_label(&record.status),
            record.email
        );
    }
}

fn status_label(status: &str) -> &str {
    if status.is_empty() {
        "(none)"
    } else {
        status
    }
}

fn cmd_ask(config: &Config, message: String) -> Result<()> {
    let client = WebhookClient::new(&config.chat).context("invalid [chat] configuration")?;

    let mut session = ChatSession::new();
    let mut input = message;
    let Some(outbound) = session.submit(&mut input) else {
        bail!("message must not be empty");
    };

    let pb = spinner("Thinking...".to_string())?;
    let outcome = runtime()?.block_on(client.send(&outbound.content, outbound.sent_at));
    pb.finish_and_clear();

    if let Some(reply) = session.complete(&outcome) {
        println!("{}", reply.content);
    }

    if !outcome.is_success() {
        bail!("chat request to {} did not succeed", client.url());
    }
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    let config_path = Config::config_path();

    println!("Configuration");
    println!("=============");
    println!();
    if config_path.exists() {
        println!("Config file: {}", config_path.display());
    } else {
        println!(
            "Config file: {} (not found, using defaults)",
            config_path.display()
        );
    }
    println!("Log file:    {}", Config::log_path().display());
    println!();
    print!(
        "{}",
        toml::to_string_pretty(config).context("failed to render configuration")?
    );
    Ok(())
}
