use crate::app::assembler::RecordAssembler;
use crate::app::library::read_library_directories;
use crate::app::manifest::ManifestScanner;
use crate::app::models::{GameRecord, ScanSettings};
use crate::app::vdf::{KeyValueDecoder, TextDecoder};

/// Games found plus the problems met on the way.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub games: Vec<GameRecord>,
    pub warnings: Vec<String>,
}

/// Runs a full library scan. Every stage degrades to an empty result
/// instead of failing, so a scan always returns a list.
pub struct Scanner {
    settings: ScanSettings,
    decoder: Box<dyn KeyValueDecoder>,
}

impl Scanner {
    pub fn new(settings: ScanSettings) -> Self {
        Self::with_decoder(settings, Box::new(TextDecoder))
    }

    pub fn with_decoder(settings: ScanSettings, decoder: Box<dyn KeyValueDecoder>) -> Self {
        Self { settings, decoder }
    }

    /// Scans and returns the games, logging each recoverable problem when
    /// `warn_on_error` is set.
    pub fn scan(&self, warn_on_error: bool) -> Vec<GameRecord> {
        self.scan_with(warn_on_error, &mut |warning: &str| log::warn!("{}", warning))
    }

    fn scan_with(&self, warn_on_error: bool, emit: &mut dyn FnMut(&str)) -> Vec<GameRecord> {
        let report = self.scan_report();
        if warn_on_error {
            for warning in &report.warnings {
                emit(warning);
            }
        }
        report.games
    }

    pub fn scan_report(&self) -> ScanReport {
        let mut report = ScanReport::default();
        let decoder = self.decoder.as_ref();

        // 1. Library folders
        let dirs = match read_library_directories(&self.settings.library_config, decoder) {
            Ok(dirs) => dirs,
            Err(err) => {
                report
                    .warnings
                    .push(format!("Unable to get steam config: {}", err));
                Vec::new()
            }
        };

        if dirs.is_empty() {
            return report;
        }

        // 2. Manifests
        let manifests = match ManifestScanner::new(&self.settings, decoder) {
            Ok(scanner) => scanner.scan(&dirs),
            Err(err) => {
                report
                    .warnings
                    .push(format!("Unable to get steam installed games: {:#}", err));
                return report;
            }
        };
        report.warnings.extend(
            manifests
                .failures
                .iter()
                .map(|failure| format!("Skipped manifest: {}", failure)),
        );

        // 3. Records
        let assembler = RecordAssembler::new(&self.settings);
        report.games = manifests
            .candidates
            .into_iter()
            .map(|candidate| assembler.assemble(candidate))
            .collect();

        log::info!("Found {} game(s)", report.games.len());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Artwork;
    use crate::app::vdf::{DecodeError, Vdf};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Lays out a fake Steam install with `config/libraryfolders.vdf`
    /// listing `libraries` plus the trailing metadata entry.
    fn steam_install(tmp: &TempDir, libraries: &[&Path]) -> ScanSettings {
        let steam = tmp.path().join("steam");
        fs::create_dir_all(steam.join("config")).unwrap();

        let mut text = String::from("\"libraryfolders\"\n{\n");
        for (i, lib) in libraries.iter().enumerate() {
            text.push_str(&format!(
                "\t\"{}\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n",
                i,
                lib.display()
            ));
        }
        text.push_str("\t\"contentstatsid\"\t\t\"-42\"\n}\n");
        fs::write(steam.join("config").join("libraryfolders.vdf"), text).unwrap();

        ScanSettings::for_steam_dir(steam)
    }

    fn add_manifest(library: &Path, appid: &str, name: &str, flags: &str) {
        let steamapps = library.join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        let text = format!(
            "\"AppState\"\n{{\n\t\"appid\"\t\t\"{}\"\n\t\"name\"\t\t\"{}\"\n\t\"StateFlags\"\t\t\"{}\"\n}}\n",
            appid, name, flags
        );
        fs::write(steamapps.join(format!("appmanifest_{}.acf", appid)), text).unwrap();
    }

    #[test]
    fn finds_installed_game_without_artwork() {
        let tmp = TempDir::new().unwrap();
        let lib1 = tmp.path().join("lib1");
        add_manifest(&lib1, "100", "Foo", "6");
        let settings = steam_install(&tmp, &[lib1.as_path()]);

        let report = Scanner::new(settings).scan_report();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(
            report.games,
            vec![GameRecord {
                id: "100".into(),
                name: "Foo".into(),
                installed: Some(true),
                artwork: Artwork::default(),
            }]
        );
    }

    #[test]
    fn ignored_runtime_is_left_out() {
        let tmp = TempDir::new().unwrap();
        let lib1 = tmp.path().join("lib1");
        add_manifest(&lib1, "221410", "Steam for Linux", "4");
        add_manifest(&lib1, "620", "Portal 2", "4");
        let settings = steam_install(&tmp, &[lib1.as_path()]);

        let games = Scanner::new(settings).scan(false);
        let ids: Vec<_> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["620"]);
    }

    #[test]
    fn resolves_artwork_from_cache() {
        let tmp = TempDir::new().unwrap();
        let lib1 = tmp.path().join("lib1");
        add_manifest(&lib1, "620", "Portal 2", "4");
        let settings = steam_install(&tmp, &[lib1.as_path()]);
        fs::create_dir_all(&settings.artwork_cache).unwrap();
        let header = settings.artwork_cache.join("620_header.jpg");
        fs::write(&header, b"jpg").unwrap();

        let games = Scanner::new(settings).scan(false);
        assert_eq!(games[0].artwork.cover, Some(header));
        assert_eq!(games[0].artwork.box_art, None);
    }

    #[test]
    fn missing_config_gives_one_warning_and_no_games() {
        let tmp = TempDir::new().unwrap();
        let settings = ScanSettings::for_steam_dir(tmp.path().join("no-steam-here"));

        let report = Scanner::new(settings).scan_report();
        assert!(report.games.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("is not found"));
    }

    #[test]
    fn warn_flag_controls_emitted_warnings() {
        let tmp = TempDir::new().unwrap();
        let scanner = Scanner::new(ScanSettings::for_steam_dir(tmp.path().join("no-steam-here")));

        let mut emitted = Vec::new();
        let games = scanner.scan_with(true, &mut |w: &str| emitted.push(w.to_string()));
        assert!(games.is_empty());
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].starts_with("Unable to get steam config"));

        let mut emitted = Vec::new();
        let games = scanner.scan_with(false, &mut |w: &str| emitted.push(w.to_string()));
        assert!(games.is_empty());
        assert!(emitted.is_empty());
    }

    #[test]
    fn metadata_first_config_scans_every_library() {
        let tmp = TempDir::new().unwrap();
        let lib1 = tmp.path().join("lib1");
        let lib2 = tmp.path().join("lib2");
        add_manifest(&lib1, "400", "Portal", "4");
        add_manifest(&lib2, "70", "Half-Life", "4");

        let steam = tmp.path().join("steam");
        fs::create_dir_all(steam.join("config")).unwrap();
        let text = format!(
            "\"libraryfolders\"\n{{\n\t\"contentstatsid\"\t\t\"-42\"\n\t\"0\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n\t\"1\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n}}\n",
            lib1.display(),
            lib2.display()
        );
        fs::write(steam.join("config").join("libraryfolders.vdf"), text).unwrap();

        let games = Scanner::new(ScanSettings::for_steam_dir(steam)).scan(false);
        let ids: Vec<_> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["400", "70"]);
    }

    #[test]
    fn undecodable_config_gives_one_warning() {
        struct Broken;
        impl KeyValueDecoder for Broken {
            fn decode(&self, _text: &str) -> Result<Vdf, DecodeError> {
                Err(DecodeError::new("unexpected end of input"))
            }
        }

        let tmp = TempDir::new().unwrap();
        let lib1 = tmp.path().join("lib1");
        add_manifest(&lib1, "620", "Portal 2", "4");
        let settings = steam_install(&tmp, &[lib1.as_path()]);

        let report = Scanner::with_decoder(settings, Box::new(Broken)).scan_report();
        assert!(report.games.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn missing_libraries_are_not_warnings() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("unplugged-drive");
        let lib2 = tmp.path().join("lib2");
        add_manifest(&lib2, "70", "Half-Life", "1026");
        let settings = steam_install(&tmp, &[gone.as_path(), lib2.as_path()]);

        let report = Scanner::new(settings).scan_report();
        assert!(report.warnings.is_empty());
        assert_eq!(report.games.len(), 1);
        assert_eq!(report.games[0].installed, Some(false));
    }

    #[test]
    fn broken_manifest_is_a_warning_not_a_failure() {
        let tmp = TempDir::new().unwrap();
        let lib1 = tmp.path().join("lib1");
        add_manifest(&lib1, "620", "Portal 2", "4");
        fs::write(
            lib1.join("steamapps").join("appmanifest_999.acf"),
            "\"AppState\" {",
        )
        .unwrap();
        let settings = steam_install(&tmp, &[lib1.as_path()]);

        let report = Scanner::new(settings).scan_report();
        assert_eq!(report.games.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("appmanifest_999.acf"));
    }

    #[test]
    fn duplicates_across_libraries_are_kept() {
        let tmp = TempDir::new().unwrap();
        let lib1 = tmp.path().join("lib1");
        let lib2 = tmp.path().join("lib2");
        add_manifest(&lib1, "620", "Portal 2", "4");
        add_manifest(&lib2, "620", "Portal 2 (copy)", "2");
        let settings = steam_install(&tmp, &[lib1.as_path(), lib2.as_path()]);

        let games = Scanner::new(settings).scan(false);
        let names: Vec<_> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Portal 2", "Portal 2 (copy)"]);
    }

    #[test]
    fn repeated_scans_are_identical() {
        let tmp = TempDir::new().unwrap();
        let lib1 = tmp.path().join("lib1");
        let lib2 = tmp.path().join("lib2");
        for (id, name) in [("400", "Portal"), ("70", "Half-Life"), ("220", "Half-Life 2")] {
            add_manifest(&lib1, id, name, "4");
        }
        add_manifest(&lib2, "10", "Counter-Strike", "0");
        let settings = steam_install(&tmp, &[lib1.as_path(), lib2.as_path()]);

        let scanner = Scanner::new(settings);
        let first = scanner.scan(true);
        let second = scanner.scan(true);
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }
}
