//! oadigest - OpenAlex client with record digestion
//!
//! Fetches records from the OpenAlex REST API, optionally flattening them
//! into analysis-friendly rows, and writes them as JSON Lines or Parquet.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use oadigest_core::{ProgressContext, Verbosity};
use oadigest_openalex::{ClientConfig, OpenAlexClient};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "oadigest")]
#[command(about = "OpenAlex client with record digestion")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./oadigest.toml or ~/.config/oadigest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Contact email for the OpenAlex polite pool (default: $OPENALEX_MAILTO)
    #[arg(long, global = true)]
    mailto: Option<String>,

    /// Maximum retry attempts for transient failures
    #[arg(long, global = true)]
    max_retries: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one record by ID
    Get(cmd::get::GetArgs),
    /// List records (one page, or all with --all)
    List(cmd::list::ListArgs),
    /// Count matching records
    Count(cmd::count::CountArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug; the spinner shows activity
    //   non-TTY: info unless --debug; logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = is_tty && !cli.debug;
    oadigest_core::init_logging(Verbosity::from_flags(quiet, cli.debug), multi)
        .context("Failed to install logger")?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    let client_config = config.client_config(cli.mailto, cli.max_retries);

    if let Command::Config = cli.command {
        print_config(&client_config, &config);
        return Ok(());
    }

    let client = OpenAlexClient::new(client_config).context("Invalid client configuration")?;
    match cli.command {
        Command::Get(args) => cmd::get::run(args, &client),
        Command::List(args) => {
            oadigest_core::install_signal_handlers()?;
            cmd::list::run(args, &client, &config, &progress)
        }
        Command::Count(args) => cmd::count::run(args, &client),
        Command::Config => Ok(()),
    }
}

fn print_config(client: &ClientConfig, config: &Config) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["Base URL", &client.base_url]);
    table.add_row(vec![
        "Mailto",
        client.mailto.as_deref().unwrap_or("not set"),
    ]);
    table.add_row(vec![
        "Default per page",
        &client.default_per_page.to_string(),
    ]);
    table.add_row(vec![
        "Connect timeout",
        &format!("{}s", client.http.connect_timeout.as_secs()),
    ]);
    table.add_row(vec![
        "Request timeout",
        &format!("{}s", client.http.request_timeout.as_secs()),
    ]);
    table.add_row(vec!["Max retries", &client.http.max_retries.to_string()]);
    table.add_row(vec![
        "Compression level",
        &config.output.compression_level.to_string(),
    ]);

    eprintln!("\n{table}");
}
