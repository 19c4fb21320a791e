use crate::app::models::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "List the games installed in the local Steam libraries"
)]
pub struct Cli {
    /// Steam installation directory (defaults to the platform's usual location)
    #[arg(long)]
    pub steam_dir: Option<PathBuf>,

    /// Path to libraryfolders.vdf (defaults to <steam-dir>/config/libraryfolders.vdf)
    #[arg(long)]
    pub library_config: Option<PathBuf>,

    /// Directory holding cached artwork (defaults to <steam-dir>/appcache/librarycache)
    #[arg(long)]
    pub artwork_cache: Option<PathBuf>,

    /// Settings file to use instead of the one in the user config directory
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    pub json: bool,

    /// Do not report unreadable config or manifest files
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Only list games whose manifest marks them fully installed
    #[arg(long)]
    pub installed_only: bool,
}
