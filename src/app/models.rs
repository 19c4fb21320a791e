use serde::Serialize;
use std::path::PathBuf;

/// Output format for the final record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Everything the scanner needs to know about the Steam install. Built by
/// `config::resolve_config`; tests construct it directly.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub steam_dir: PathBuf,
    pub library_config: PathBuf,
    pub artwork_cache: PathBuf,
    pub ignored_app_ids: Vec<String>,
    pub installed_mask: u32,
}

/// Steam's own runtime packages, which show up as apps in every library.
pub const IGNORED_APP_IDS: [&str; 3] = [
    "221410",  // Steam for Linux
    "228980",  // Steamworks Common Redistributables
    "1070560", // Steam Linux Runtime
];

/// StateFlags bit meaning "fully installed".
pub const INSTALLED_MASK: u32 = 4;

impl ScanSettings {
    /// Settings for a Steam install rooted at `steam_dir`, with the standard
    /// file layout underneath it.
    pub fn for_steam_dir(steam_dir: PathBuf) -> Self {
        Self {
            library_config: steam_dir.join("config").join("libraryfolders.vdf"),
            artwork_cache: steam_dir.join("appcache").join("librarycache"),
            steam_dir,
            ignored_app_ids: IGNORED_APP_IDS.iter().map(|id| id.to_string()).collect(),
            installed_mask: INSTALLED_MASK,
        }
    }

    pub fn is_ignored(&self, app_id: &str) -> bool {
        self.ignored_app_ids.iter().any(|id| id == app_id)
    }
}

/// Final configuration after merging the settings file and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub scan: ScanSettings,
    pub warn_on_error: bool,
    pub format: OutputFormat,
    pub installed_only: bool,
}

/// One storage root registered in `libraryfolders.vdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDirectory {
    pub path: PathBuf,
    pub recursive: bool,
}

impl LibraryDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
        }
    }
}

/// A title read from an `appmanifest_*.acf` file, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestCandidate {
    pub id: String,
    pub name: String,
    pub state_flags: Option<u32>,
    pub source: PathBuf,
}

/// Cached artwork that exists on disk for a title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_art: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
}

impl Artwork {
    pub fn count(&self) -> usize {
        [&self.box_art, &self.cover, &self.icon]
            .iter()
            .filter(|p| p.is_some())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    pub name: String,
    /// `None` when the manifest has no StateFlags at all.
    pub installed: Option<bool>,
    pub artwork: Artwork,
}
