use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::Repository;
use crate::config::StorageSettings;
use crate::domain::{Player, Tournament, TournamentId};
use crate::errors::{parse_context, read_context, write_context};

const PLAYERS_FILE: &str = "players.json";

/// JSON documents under `<data_dir>/players` and `<data_dir>/tournaments`
pub struct JsonRepository {
    players_dir: PathBuf,
    tournaments_dir: PathBuf,
}

impl JsonRepository {
    /// Create a repository, creating its directories if needed
    pub fn new(settings: &StorageSettings) -> Result<Self> {
        let players_dir = settings.players_dir();
        let tournaments_dir = settings.tournaments_dir();

        fs::create_dir_all(&players_dir).context("Failed to create players directory")?;
        fs::create_dir_all(&tournaments_dir).context("Failed to create tournaments directory")?;

        Ok(Self {
            players_dir,
            tournaments_dir,
        })
    }

    fn players_path(&self) -> PathBuf {
        self.players_dir.join(PLAYERS_FILE)
    }

    fn tournament_path(&self, id: &TournamentId) -> PathBuf {
        self.tournaments_dir.join(format!("{}.json", id))
    }

    /// Writes next to the target and renames over it, so readers never see half a file
    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move {} into place", temp_path.display()))?;

        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn read_json_opt<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                path,
                json.chars().take(200).collect::<String>()
            )
        })?;
        Ok(Some(data))
    }

    fn tournament_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.tournaments_dir)
            .context("Failed to list tournaments directory")?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Repository for JsonRepository {
    fn load_players(&self) -> Result<Vec<Player>> {
        let players = self
            .read_json_opt::<Vec<Player>>(&self.players_path())
            .with_context(|| read_context("players", PLAYERS_FILE))?
            .unwrap_or_default();
        Ok(players)
    }

    fn save_players(&mut self, players: &[Player]) -> Result<()> {
        self.write_json(&self.players_path(), &players)
            .with_context(|| write_context("players", PLAYERS_FILE))?;
        info!("Saved {} players", players.len());
        Ok(())
    }

    fn load_tournament(&self, id: &TournamentId) -> Result<Option<Tournament>> {
        self.read_json_opt(&self.tournament_path(id))
            .with_context(|| read_context("tournament", id.as_str()))
    }

    fn save_tournament(&mut self, tournament: &Tournament) -> Result<()> {
        self.write_json(&self.tournament_path(&tournament.id), tournament)
            .with_context(|| write_context("tournament", tournament.id.as_str()))?;
        info!("Saved tournament {}", tournament.id);
        Ok(())
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        let mut tournaments = Vec::new();
        for path in self.tournament_files()? {
            match self.read_json_opt::<Tournament>(&path) {
                Ok(Some(tournament)) => tournaments.push(tournament),
                Ok(None) => {}
                Err(e) => warn!("{}: {:#}", parse_context("tournament file"), e),
            }
        }
        Ok(tournaments)
    }
}
