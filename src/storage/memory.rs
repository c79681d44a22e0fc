use anyhow::Result;
use std::collections::BTreeMap;

use super::Repository;
use crate::domain::{Player, Tournament, TournamentId};

/// Keeps everything in memory; used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    players: Vec<Player>,
    tournaments: BTreeMap<TournamentId, Tournament>,
    saves: usize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of save calls so far
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Repository for MemoryRepository {
    fn load_players(&self) -> Result<Vec<Player>> {
        Ok(self.players.clone())
    }

    fn save_players(&mut self, players: &[Player]) -> Result<()> {
        self.players = players.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn load_tournament(&self, id: &TournamentId) -> Result<Option<Tournament>> {
        Ok(self.tournaments.get(id).cloned())
    }

    fn save_tournament(&mut self, tournament: &Tournament) -> Result<()> {
        self.tournaments
            .insert(tournament.id.clone(), tournament.clone());
        self.saves += 1;
        Ok(())
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        Ok(self.tournaments.values().cloned().collect())
    }
}
