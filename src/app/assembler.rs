use crate::app::models::{Artwork, GameRecord, ManifestCandidate, ScanSettings};
use std::path::{Path, PathBuf};

/// Turns manifest candidates into final records: installed state from the
/// StateFlags bitmask plus whatever cached artwork exists.
pub struct RecordAssembler<'a> {
    cache_dir: &'a Path,
    installed_mask: u32,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(settings: &'a ScanSettings) -> Self {
        Self {
            cache_dir: &settings.artwork_cache,
            installed_mask: settings.installed_mask,
        }
    }

    pub fn assemble(&self, candidate: ManifestCandidate) -> GameRecord {
        let installed = candidate
            .state_flags
            .map(|flags| (flags & self.installed_mask) != 0);
        let artwork = self.find_artwork(&candidate.id);
        log::debug!(
            "{} ({}): {} artwork file(s), from {}",
            candidate.id,
            candidate.name,
            artwork.count(),
            candidate.source.display()
        );

        GameRecord {
            id: candidate.id,
            name: candidate.name,
            installed,
            artwork,
        }
    }

    fn find_artwork(&self, id: &str) -> Artwork {
        Artwork {
            box_art: self.cached(format!("{}_library_600x900.jpg", id)),
            cover: self.cached(format!("{}_header.jpg", id)),
            icon: self.cached(format!("{}_icon.jpg", id)),
        }
    }

    fn cached(&self, file_name: String) -> Option<PathBuf> {
        let path = self.cache_dir.join(file_name);
        path.exists().then_some(path)
    }
}
