use crate::app::models::GameRecord;
use anyhow::{Context, Result};

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn generate_table(games: &[GameRecord]) -> String {
        let id_width = games.iter().map(|g| g.id.len()).max().unwrap_or(0).max(2);
        let mut output = format!("{:<id_width$}  INSTALLED  ART  NAME\n", "ID");

        for game in games {
            let installed = match game.installed {
                Some(true) => "yes",
                Some(false) => "no",
                None => "?",
            };
            output.push_str(&format!(
                "{:<id_width$}  {:<9}  {:>3}  {}\n",
                game.id,
                installed,
                game.artwork.count(),
                game.name
            ));
        }

        output.push_str(&format!("\n{} game(s)", games.len()));
        output
    }

    pub fn generate_json(games: &[GameRecord]) -> Result<String> {
        serde_json::to_string_pretty(games).context("Failed to serialize games as JSON")
    }
}
