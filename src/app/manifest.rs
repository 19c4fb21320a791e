use crate::app::error::ScanError;
use crate::app::library::load_tree;
use crate::app::models::{LibraryDirectory, ManifestCandidate, ScanSettings};
use crate::app::vdf::KeyValueDecoder;
use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STEAMAPPS_DIR: &str = "steamapps";
const MANIFEST_PATTERN: &str = "appmanifest_*.acf";

/// Result of scanning every library directory. Per-file failures are kept
/// so the caller can report them; they never stop the scan.
#[derive(Debug, Default)]
pub struct ManifestScan {
    pub candidates: Vec<ManifestCandidate>,
    pub failures: Vec<ScanError>,
}

pub struct ManifestScanner<'a> {
    settings: &'a ScanSettings,
    decoder: &'a dyn KeyValueDecoder,
    manifest_matcher: GlobMatcher,
}

impl<'a> ManifestScanner<'a> {
    pub fn new(settings: &'a ScanSettings, decoder: &'a dyn KeyValueDecoder) -> Result<Self> {
        let manifest_matcher = Glob::new(MANIFEST_PATTERN)
            .context(format!("Invalid glob pattern: {}", MANIFEST_PATTERN))?
            .compile_matcher();

        Ok(Self {
            settings,
            decoder,
            manifest_matcher,
        })
    }

    /// Reads the manifests of every directory, in directory order and then
    /// file name order.
    pub fn scan(&self, dirs: &[LibraryDirectory]) -> ManifestScan {
        let mut result = ManifestScan::default();

        for dir in dirs {
            log::debug!(
                "Scanning library {} (recursive: {})",
                dir.path.display(),
                dir.recursive
            );
            let steamapps = dir.path.join(STEAMAPPS_DIR);
            let manifests = match self.list_manifests(&steamapps) {
                Ok(paths) => paths,
                Err(err) => {
                    log::debug!("Skipping library {}: {}", dir.path.display(), err);
                    continue;
                }
            };

            for path in manifests {
                match self.read_manifest(&path) {
                    Ok(Some(candidate)) => result.candidates.push(candidate),
                    Ok(None) => {}
                    Err(err) => {
                        log::debug!("Skipping manifest: {}", err);
                        result.failures.push(err);
                    }
                }
            }
        }

        result
    }

    fn list_manifests(&self, steamapps: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let entries = fs::read_dir(steamapps).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound(steamapps.to_path_buf()),
            _ => ScanError::Io {
                path: steamapps.to_path_buf(),
                source,
            },
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
            .filter(|name| self.manifest_matcher.is_match(name))
            .collect();
        names.sort();

        Ok(names.into_iter().map(|name| steamapps.join(name)).collect())
    }

    /// `Ok(None)` means the manifest is valid but not a title we report.
    fn read_manifest(&self, path: &Path) -> Result<Option<ManifestCandidate>, ScanError> {
        let tree = load_tree(path, self.decoder)?;
        let Some(state) = tree.get_map("AppState") else {
            log::debug!("No AppState block in {}", path.display());
            return Ok(None);
        };

        let id = match state.get_str("appid") {
            Some(id) if !id.is_empty() => id,
            _ => {
                log::debug!("No appid in {}", path.display());
                return Ok(None);
            }
        };

        if !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScanError::invalid_format(
                path,
                format!("appid {:?} is not numeric", id),
            ));
        }

        if self.settings.is_ignored(id) {
            log::debug!("Ignoring Steam runtime entry {}", id);
            return Ok(None);
        }

        let state_flags = state
            .get_str("StateFlags")
            .map(|raw| parse_state_flags(raw, path));

        Ok(Some(ManifestCandidate {
            id: id.to_string(),
            name: state.get_str("name").unwrap_or_default().to_string(),
            state_flags,
            source: path.to_path_buf(),
        }))
    }
}

fn parse_state_flags(raw: &str, path: &Path) -> u32 {
    raw.trim().parse().unwrap_or_else(|_| {
        log::debug!(
            "Non-numeric StateFlags {:?} in {}, treating as 0",
            raw,
            path.display()
        );
        0
    })
}
