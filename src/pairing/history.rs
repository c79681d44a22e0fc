use std::collections::BTreeMap;

use crate::domain::{Match, Pairing, PlayerId, Round};
use crate::errors::{CoreResult, TournamentError};

/// Unordered pair of players, smaller id first
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PairKey(PlayerId, PlayerId);

impl PairKey {
    fn new(a: &PlayerId, b: &PlayerId) -> CoreResult<Self> {
        if a == b {
            return Err(TournamentError::invalid_pairing(format!(
                "{} cannot be paired with themselves",
                a
            )));
        }
        if a < b {
            Ok(PairKey(a.clone(), b.clone()))
        } else {
            Ok(PairKey(b.clone(), a.clone()))
        }
    }
}

/// Who has already met whom in a tournament, and how often each player had white
#[derive(Debug, Clone, Default)]
pub struct PairingHistory {
    last_met: BTreeMap<PairKey, u32>,
    whites: BTreeMap<PlayerId, u32>,
}

impl PairingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the history from every completed round
    pub fn from_rounds(rounds: &[Round]) -> CoreResult<Self> {
        let mut history = Self::new();
        for round in rounds.iter().filter(|r| r.is_complete()) {
            for game in &round.matches {
                history.record(game)?;
            }
        }
        Ok(history)
    }

    /// Registers a played game. Recording the same game twice changes nothing.
    pub fn record(&mut self, game: &Match) -> CoreResult<()> {
        let Pairing::Game { white, black, .. } = &game.pairing else {
            return Ok(());
        };

        let key = PairKey::new(white, black)?;
        let round = game.id.round;
        match self.last_met.get(&key) {
            Some(&seen) if seen >= round => {}
            _ => {
                self.last_met.insert(key, round);
                *self.whites.entry(white.clone()).or_insert(0) += 1;
            }
        }
        Ok(())
    }

    pub fn has_played(&self, a: &PlayerId, b: &PlayerId) -> CoreResult<bool> {
        Ok(self.last_met.contains_key(&PairKey::new(a, b)?))
    }

    /// Round in which the two players last met
    pub fn last_met(&self, a: &PlayerId, b: &PlayerId) -> Option<u32> {
        let key = PairKey::new(a, b).ok()?;
        self.last_met.get(&key).copied()
    }

    pub fn whites(&self, player: &PlayerId) -> u32 {
        self.whites.get(player).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.last_met.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_met.is_empty()
    }
}
