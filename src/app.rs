// Declare modules
pub mod assembler;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod library;
pub mod manifest;
pub mod models;
pub mod scanner;
pub mod vdf;

use anyhow::Result;
use clap::Parser;

use self::cli::Cli;
use self::config::resolve_config;
use self::formatter::OutputGenerator;
use self::models::OutputFormat;
use self::scanner::Scanner;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration
    let config = resolve_config(args)?;
    log::info!("Using Steam directory {}", config.scan.steam_dir.display());

    // 3. Scan Libraries
    let scanner = Scanner::new(config.scan);
    let mut games = scanner.scan(config.warn_on_error);

    if config.installed_only {
        games.retain(|game| game.installed == Some(true));
    }

    if games.is_empty() && config.format == OutputFormat::Table {
        log::warn!("No installed games found.");
        return Ok(());
    }

    // 4. Generate Output
    let output = match config.format {
        OutputFormat::Table => OutputGenerator::generate_table(&games),
        OutputFormat::Json => OutputGenerator::generate_json(&games)?,
    };

    // 5. Print to Stdout
    println!("{}", output);

    Ok(())
}
