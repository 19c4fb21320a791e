use crate::app::error::ScanError;
use crate::app::models::LibraryDirectory;
use crate::app::vdf::{KeyValueDecoder, Value, Vdf};
use std::fs;
use std::path::Path;

const LIBRARY_FOLDERS_KEY: &str = "libraryfolders";

/// Reads and decodes a KeyValues file.
pub fn load_tree(path: &Path, decoder: &dyn KeyValueDecoder) -> Result<Vdf, ScanError> {
    if !path.exists() {
        return Err(ScanError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    decoder.decode(&text).map_err(|source| ScanError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Lists the library directories declared in `libraryfolders.vdf`.
pub fn read_library_directories(
    config_path: &Path,
    decoder: &dyn KeyValueDecoder,
) -> Result<Vec<LibraryDirectory>, ScanError> {
    let config = load_tree(config_path, decoder)?;
    library_directories(&config, config_path)
}

fn library_directories(
    config: &Vdf,
    config_path: &Path,
) -> Result<Vec<LibraryDirectory>, ScanError> {
    let folders = match config.get(LIBRARY_FOLDERS_KEY) {
        None => {
            return Err(ScanError::invalid_format(
                config_path,
                "libraryfolders key undefined",
            ))
        }
        Some(value) => value.as_map().ok_or_else(|| {
            ScanError::invalid_format(config_path, "libraryfolders is not a block")
        })?,
    };

    // The final entry is Steam's metadata (e.g. "contentstatsid"), not a library.
    let children = enumeration_order(folders);
    let library_count = children.len().saturating_sub(1);

    let mut dirs = Vec::with_capacity(library_count);
    for (key, entry) in children.into_iter().take(library_count) {
        match entry.as_map().and_then(|e| e.get_str("path")) {
            Some(path) if !path.is_empty() => dirs.push(LibraryDirectory::new(path)),
            _ => log::debug!("Skipping library entry {:?} without a path", key),
        }
    }

    log::info!(
        "Found {} library folder(s) in {}",
        dirs.len(),
        config_path.display()
    );
    Ok(dirs)
}

/// Children of `libraryfolders` in object-property order: integer keys
/// ascending, then the other keys in first-seen order. A repeated key keeps
/// its first position and its last value. This puts `contentstatsid` after
/// the numbered libraries wherever Steam wrote it.
fn enumeration_order(folders: &Vdf) -> Vec<(&str, &Value)> {
    let mut indexed: Vec<(u32, &str, &Value)> = Vec::new();
    let mut named: Vec<(&str, &Value)> = Vec::new();

    for (key, value) in folders.iter() {
        match array_index(key) {
            Some(index) => match indexed.iter_mut().find(|(i, _, _)| *i == index) {
                Some(slot) => slot.2 = value,
                None => indexed.push((index, key, value)),
            },
            None => match named.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => named.push((key, value)),
            },
        }
    }

    indexed.sort_by_key(|(index, _, _)| *index);
    indexed
        .into_iter()
        .map(|(_, key, value)| (key, value))
        .chain(named)
        .collect()
}

/// `Some(n)` for canonical array indices like "0" or "12" (not "012" or "+1").
fn array_index(key: &str) -> Option<u32> {
    let index: u32 = key.parse().ok()?;
    (index != u32::MAX && index.to_string() == key).then_some(index)
}
