mod json;
mod memory;

use anyhow::Result;

use crate::domain::{Player, Tournament, TournamentId};

pub use json::JsonRepository;
pub use memory::MemoryRepository;

/// Where players and tournaments are kept between sessions.
///
/// The core hands over fully built records and never sees the storage format.
pub trait Repository {
    fn load_players(&self) -> Result<Vec<Player>>;

    fn save_players(&mut self, players: &[Player]) -> Result<()>;

    fn load_tournament(&self, id: &TournamentId) -> Result<Option<Tournament>>;

    fn save_tournament(&mut self, tournament: &Tournament) -> Result<()>;

    fn list_tournaments(&self) -> Result<Vec<Tournament>>;
}
