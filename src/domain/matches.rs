use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::player::PlayerId;
use super::points::Points;
use crate::errors::{CoreResult, TournamentError};

/// Board `board` of round `round`, written `round.board`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId {
    pub round: u32,
    pub board: u32,
}

impl MatchId {
    pub fn new(round: u32, board: u32) -> Self {
        Self { round, board }
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.round, self.board)
    }
}

impl FromStr for MatchId {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            TournamentError::invalid_record("match id", format!("'{}' should look like 2.3", s))
        };
        let (round, board) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(MatchId {
            round: round.parse().map_err(|_| invalid())?,
            board: board.parse().map_err(|_| invalid())?,
        })
    }
}

/// Outcome of a played game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    /// Points for (white, black). Always sums to one point.
    pub fn points(self) -> (Points, Points) {
        match self {
            GameResult::WhiteWins => (Points::ONE, Points::ZERO),
            GameResult::BlackWins => (Points::ZERO, Points::ONE),
            GameResult::Draw => (Points::HALF, Points::HALF),
        }
    }

    pub fn notation(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "½-½",
        }
    }
}

impl FromStr for GameResult {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1-0" | "white" | "w" => Ok(GameResult::WhiteWins),
            "0-1" | "black" | "b" => Ok(GameResult::BlackWins),
            "1/2-1/2" | "½-½" | "1/2" | "draw" | "d" => Ok(GameResult::Draw),
            other => Err(TournamentError::invalid_record(
                "result",
                format!("'{}' is not one of 1-0, 0-1, 1/2-1/2", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pairing {
    Game {
        white: PlayerId,
        black: PlayerId,
        result: Option<GameResult>,
    },
    /// Odd player out; resolved as soon as it is created
    Bye { player: PlayerId, points: Points },
}

/// One board of a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub pairing: Pairing,
}

impl Match {
    pub fn game(id: MatchId, white: PlayerId, black: PlayerId) -> CoreResult<Self> {
        if white == black {
            return Err(TournamentError::invalid_pairing(format!(
                "{} cannot play against themselves",
                white
            )));
        }
        Ok(Self {
            id,
            pairing: Pairing::Game {
                white,
                black,
                result: None,
            },
        })
    }

    pub fn bye(id: MatchId, player: PlayerId, points: Points) -> Self {
        Self {
            id,
            pairing: Pairing::Bye { player, points },
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self.pairing, Pairing::Bye { .. })
    }

    pub fn is_resolved(&self) -> bool {
        match &self.pairing {
            Pairing::Game { result, .. } => result.is_some(),
            Pairing::Bye { .. } => true,
        }
    }

    pub fn players(&self) -> Vec<&PlayerId> {
        match &self.pairing {
            Pairing::Game { white, black, .. } => vec![white, black],
            Pairing::Bye { player, .. } => vec![player],
        }
    }

    pub fn involves(&self, player_id: &PlayerId) -> bool {
        self.players().contains(&player_id)
    }

    pub fn white(&self) -> Option<&PlayerId> {
        match &self.pairing {
            Pairing::Game { white, .. } => Some(white),
            Pairing::Bye { .. } => None,
        }
    }

    /// Stores the outcome of a game. A match takes exactly one result.
    pub fn record(&mut self, outcome: GameResult) -> CoreResult<()> {
        match &mut self.pairing {
            Pairing::Game { result: Some(_), .. } | Pairing::Bye { .. } => {
                Err(TournamentError::MatchAlreadyResolved(self.id))
            }
            Pairing::Game { result, .. } => {
                *result = Some(outcome);
                Ok(())
            }
        }
    }

    /// Points awarded to each participant.
    pub fn awards(&self) -> CoreResult<Vec<(&PlayerId, Points)>> {
        match &self.pairing {
            Pairing::Game {
                white,
                black,
                result: Some(result),
            } => {
                let (white_points, black_points) = result.points();
                Ok(vec![(white, white_points), (black, black_points)])
            }
            Pairing::Game { result: None, .. } => Err(TournamentError::UnresolvedMatch(self.id)),
            Pairing::Bye { player, points } => Ok(vec![(player, *points)]),
        }
    }

    pub fn total_awarded(&self) -> CoreResult<Points> {
        Ok(self.awards()?.into_iter().map(|(_, points)| points).sum())
    }
}
