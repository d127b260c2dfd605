//! Bundle Builder - Main entry point
//!
//! Thin binary over the `bundle_builder` library: parses arguments, sets up
//! logging, loads files and hands off to the command handlers or the wizard.

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use bundle_builder::cli::{Cli, Commands};
use bundle_builder::commands;
use bundle_builder::ui::{WizardApp, WizardOutcome};
use bundle_builder::ui::screens::money;
use bundle_builder::{BuilderError, BundleId, EngineConfig, Quote, ShoppingSession};

/// Initialize the tracing subscriber. `RUST_LOG` overrides `default_level`.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // The wizard owns the screen; keep log noise off it
    let level = match cli.command {
        Commands::Shop { .. } => "warn",
        _ => "info",
    };
    init_tracing(level);
    debug!("CLI arguments parsed");

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = EngineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Init { path, force } => {
            commands::init_catalog(&path, force)?;
            println!("✓ Sample catalog written to {:?}", path);
        }
        Commands::List { catalog } => {
            let catalog = commands::load_catalog(&catalog)?;
            print!("{}", commands::render_list(&catalog));
        }
        Commands::Validate { catalog: path } => {
            info!("Validating catalog file: {:?}", path);
            match commands::load_catalog(&path) {
                Ok(catalog) => {
                    println!(
                        "✓ Catalog is valid: {} bundles, {} products",
                        catalog.bundles.len(),
                        catalog.products.len()
                    );
                }
                Err(e) => {
                    error!("Catalog validation failed: {:#}", e);
                    eprintln!("✗ Catalog validation failed: {:#}", e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Quote {
            catalog,
            bundle,
            picks,
        } => {
            let catalog = commands::load_catalog(&catalog)?;
            let bundle = commands::find_bundle(&catalog, bundle)?;
            let state = commands::replay_picks(&bundle, &picks)?;
            let quote = Quote::compute(&bundle, &state, &config.pricing);
            println!("{}", commands::render_quote(&bundle, &state, &quote));
        }
        Commands::Shop { catalog, bundle } => {
            return shop(&catalog, bundle, config);
        }
        Commands::Author {
            catalog: path,
            bundle,
            action,
        } => {
            let mut catalog = commands::load_catalog(&path)?;
            let message = commands::apply_author(&mut catalog, bundle, action)?;
            catalog
                .validate()
                .context("Edit would leave the catalog invalid; nothing was saved")?;
            catalog.save_to_file(&path)?;
            println!("✓ {}", message);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Run the storefront wizard for one bundle
fn shop(path: &Path, id: BundleId, config: EngineConfig) -> Result<ExitCode> {
    let catalog = commands::load_catalog(path)?;
    let bundle = commands::shoppable_bundle(&catalog, id)?;
    let session = ShoppingSession::start(Arc::new(bundle))?;
    let mut app = WizardApp::new(session, config);

    debug!("Initializing terminal for wizard");
    enable_raw_mode()
        .map_err(|e| BuilderError::terminal(format!("Failed to enable raw mode: {}", e)))?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen).map_err(|e| {
        BuilderError::terminal(format!("Failed to enter alternate screen: {}", e))
    })?;

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .map_err(|e| {
            anyhow::Error::from(BuilderError::terminal(format!(
                "Failed to create terminal: {}",
                e
            )))
        })
        .and_then(|mut terminal| app.run(&mut terminal));

    // Cleanup terminal (always attempt cleanup, even if the wizard failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    match result? {
        WizardOutcome::CheckedOut(line) => {
            println!("✓ Added '{}' to cart", line.bundle_name);
            for (step, product) in &line.items {
                println!(
                    "  step {:<3} {:<28} {:>10}",
                    step.get(),
                    product.name,
                    money(product.price)
                );
            }
            println!("  Total: {}", money(line.quote.final_price));
            Ok(ExitCode::SUCCESS)
        }
        WizardOutcome::Abandoned => {
            println!("Bundle not added to cart");
            Ok(ExitCode::SUCCESS)
        }
    }
}
