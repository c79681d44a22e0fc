use crate::domain::{Player, PlayerId, Tournament};
use crate::errors::{CoreResult, TournamentError};
use crate::scoring;

/// All registered players, in registration order
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new(players: Vec<Player>) -> CoreResult<Self> {
        let mut registry = Self::default();
        for player in players {
            registry.register(player)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, player: Player) -> CoreResult<()> {
        if self.get(&player.national_id).is_some() {
            return Err(TournamentError::DuplicatePlayer(player.national_id));
        }
        self.players.push(player);
        Ok(())
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.national_id == id)
    }

    pub fn require(&self, id: &PlayerId) -> CoreResult<&Player> {
        self.get(id)
            .ok_or_else(|| TournamentError::UnknownPlayer(id.clone()))
    }

    pub fn all(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players sorted by last name, then first name
    pub fn alphabetical(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by(|a, b| {
            a.last_name
                .to_lowercase()
                .cmp(&b.last_name.to_lowercase())
                .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
                .then_with(|| a.national_id.cmp(&b.national_id))
        });
        sorted
    }

    /// Credits a finished tournament to the lifetime scores, at most once per player
    pub fn credit_tournament(&mut self, tournament: &Tournament) -> CoreResult<usize> {
        scoring::credit_lifetime(&mut self.players, tournament)
    }
}
