//! packsel - main entry point
//!
//! Loads a catalog, runs the selection panel (or resolves a selection
//! non-interactively) and prints the packs to install.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use packsel::cli::{Cli, Commands};
use packsel::config::CatalogFile;
use packsel::console::StdConsole;
use packsel::controller::SelectionSession;
use packsel::messages::Messages;
use packsel::model::SelectionModel;
use packsel::types::{Pack, RowStatus};
use packsel::units::{ByteFormatter, ByteUnits};

/// Initialize the tracing subscriber; logs go to stderr so the menu on
/// stdout stays readable.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    debug!("CLI arguments parsed: {:?}", cli);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Select {
            catalog,
            messages,
            variables,
            conditions,
            yes,
        } => run_select(&catalog, messages.as_deref(), &variables, &conditions, yes),
        Commands::Resolve {
            catalog,
            conditions,
            without,
            json,
            packs,
        } => run_resolve(&catalog, &conditions, &packs, &without, json),
        Commands::Validate { catalog } => {
            info!("Validating catalog file: {:?}", catalog);
            let file = CatalogFile::load_from_file(&catalog)?;
            file.validate()?;
            println!("✓ Catalog is valid: {} packs", file.packs.len());
            Ok(ExitCode::SUCCESS)
        }
        Commands::List {
            catalog,
            conditions,
        } => {
            let file = CatalogFile::load_from_file(&catalog)?;
            let model = SelectionModel::new(file.build_catalog(&conditions)?);
            let checked = model.finalize_selection();
            for pack in model.catalog().packs() {
                let mark = if checked.iter().any(|p| p.id == pack.id) { "x" } else { " " };
                let visibility = if pack.visible { "" } else { " (hidden)" };
                println!(
                    "[{}] {:<20} {:<10} {}{}",
                    mark,
                    pack.id,
                    RowStatus::of(pack).to_string(),
                    ByteUnits.format_bytes(pack.size_bytes),
                    visibility
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_select(
    catalog_path: &Path,
    messages_path: Option<&Path>,
    variables: &[(String, String)],
    conditions: &[String],
    assume_yes: bool,
) -> Result<ExitCode> {
    info!("Loading catalog from: {:?}", catalog_path);
    let file = CatalogFile::load_from_file(catalog_path)?;
    let mut model = SelectionModel::new(file.build_catalog(conditions)?);
    let substitutor = file.substitutor(variables);

    let defaults = Messages::defaults();
    let messages = match messages_path {
        Some(path) => defaults.new_messages_or_self(path),
        None => defaults,
    };

    let mut console = StdConsole::stdio().assume_yes(assume_yes);
    let outcome = SelectionSession::new(&mut model, &messages)
        .with_substitutor(&substitutor)
        .run(&mut console)
        .context("Pack selection failed")?;

    if !outcome.proceed {
        println!("Installation aborted.");
        return Ok(ExitCode::FAILURE);
    }

    print_selection(&outcome.selected, outcome.total_size);
    Ok(ExitCode::SUCCESS)
}

fn run_resolve(
    catalog_path: &Path,
    conditions: &[String],
    packs: &[String],
    without: &[String],
    json: bool,
) -> Result<ExitCode> {
    let file = CatalogFile::load_from_file(catalog_path)?;
    let mut model = SelectionModel::new(file.build_catalog(conditions)?);

    for id in packs {
        model.select_by_id(id)?;
    }
    for id in without {
        model
            .deselect_by_id(id)?
            .into_result()
            .with_context(|| format!("Cannot leave out '{}'", id))?;
    }

    let selected = model.finalize_selection();
    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else {
        print_selection(&selected, model.total_selected_size());
    }
    Ok(ExitCode::SUCCESS)
}

fn print_selection(selected: &[Pack], total_size: u64) {
    println!("Packs to install:");
    for pack in selected {
        println!("  {} ({})", pack.id, ByteUnits.format_bytes(pack.size_bytes));
    }
    println!("Total: {}", ByteUnits.format_bytes(total_size));
}
