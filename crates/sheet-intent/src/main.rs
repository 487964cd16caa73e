//! # sheet-intent
//!
//! Command-line driver for the add-on's server side, working on a workbook
//! snapshot instead of a live spreadsheet.
//!
//! ## Usage
//!
//! ```text
//! sheet-intent --workbook sales.json [--anchor C3] [--config addon.yaml]
//!              [--query form.json [--dates profile.json] [--dry-run]]
//! sheet-intent --print-form-schema
//! ```
//!
//! The preselected table is printed first. With `--query`, dates are detected
//! (or loaded from `--dates`) and the query result is printed; `--dry-run`
//! prints the wire query instead of sending it.

use std::sync::Arc;

use anyhow::Context;
use sheet_intent::IntentService;
use sheet_intent_core::{AddOnConfig, DateColumnProfile, QueryForm};
use sheet_intent_gateway::ReqwestTransport;
use sheet_intent_session::{InMemoryWorkbook, MemoryPropertyStore};
use tracing_subscriber::EnvFilter;

/// Value following `flag` on the command line.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn read(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {path}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--print-form-schema") {
        let schema = schemars::schema_for!(QueryForm);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let config = match flag_value(&args, "--config") {
        Some(path) => {
            AddOnConfig::from_file(path).with_context(|| format!("loading config {path}"))?
        }
        None => AddOnConfig::default(),
    };

    // Initialize logging; stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("sheet-intent v{} starting", env!("CARGO_PKG_VERSION"));

    let workbook_path = flag_value(&args, "--workbook").context("missing --workbook <path>")?;
    let mut workbook = InMemoryWorkbook::from_json(&read(workbook_path)?)?;
    if let Some(anchor) = flag_value(&args, "--anchor") {
        workbook.select_a1(anchor)?;
    }

    let transport = Arc::new(ReqwestTransport::from_settings(&config.endpoints)?);
    let mut service = IntentService::new(workbook, MemoryPropertyStore::new(), transport, &config);

    let launch = service.launch()?;
    println!("{}", serde_json::to_string_pretty(&launch)?);

    let Some(query_path) = flag_value(&args, "--query") else {
        return Ok(());
    };
    let form = service.form_from_json(&read(query_path)?)?;
    let dry_run = args.iter().any(|arg| arg == "--dry-run");

    match flag_value(&args, "--dates") {
        Some(path) => {
            let profile: DateColumnProfile = serde_json::from_str(&read(path)?)?;
            service.session_mut().store_date_columns(&profile)?;
        }
        None if !dry_run => {
            service.detect_dates().await?;
        }
        None => {}
    }

    if dry_run {
        println!("{}", service.describe(&form)?);
    } else {
        let result = service.eval_query(&form).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    tracing::info!("sheet-intent finished");
    Ok(())
}
