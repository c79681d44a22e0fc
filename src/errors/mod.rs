use thiserror::Error;

use crate::domain::{MatchId, PlayerId};

/// State violations and caller misuse raised by the tournament core.
///
/// None of these are transient: the caller decides whether to re-prompt or abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("Invalid pairing: {reason}")]
    InvalidPairing { reason: String },

    #[error("Not enough active players to pair a round: {active} active, at least 2 needed")]
    InsufficientPlayers { active: usize },

    #[error("Match {0} already has a result")]
    MatchAlreadyResolved(MatchId),

    #[error("Match {0} has no result yet")]
    UnresolvedMatch(MatchId),

    #[error("Tournament is finished: all {rounds} rounds have been played")]
    TournamentFinished { rounds: u32 },

    #[error("Round {round} is not complete yet")]
    RoundNotComplete { round: u32 },

    #[error("Tournament still has rounds to play: {played} of {configured} complete")]
    RoundsRemaining { played: u32, configured: u32 },

    #[error("Roster is locked once the first round has started")]
    RosterLocked,

    #[error("No match {0} in this tournament")]
    UnknownMatch(MatchId),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {0} is already registered")]
    DuplicatePlayer(PlayerId),

    #[error("Invalid {field}: {reason}")]
    InvalidRecord { field: &'static str, reason: String },
}

impl TournamentError {
    pub fn invalid_pairing(reason: impl Into<String>) -> Self {
        TournamentError::InvalidPairing {
            reason: reason.into(),
        }
    }

    pub fn invalid_record(field: &'static str, reason: impl Into<String>) -> Self {
        TournamentError::InvalidRecord {
            field,
            reason: reason.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, TournamentError>;

/// Add context to storage reads
pub fn read_context(kind: &str, key: &str) -> String {
    format!("Failed to read {} '{}'", kind, key)
}

/// Add context to storage writes
pub fn write_context(kind: &str, key: &str) -> String {
    format!("Failed to write {} '{}'", kind, key)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_item() {
        let err = TournamentError::MatchAlreadyResolved(MatchId::new(2, 3));
        assert_eq!(err.to_string(), "Match 2.3 already has a result");

        let err = TournamentError::InsufficientPlayers { active: 1 };
        assert!(err.to_string().contains("1 active"));
    }

    #[test]
    fn test_core_errors_survive_anyhow() {
        let err: anyhow::Error = TournamentError::RoundNotComplete { round: 1 }.into();
        assert_eq!(
            err.downcast_ref::<TournamentError>(),
            Some(&TournamentError::RoundNotComplete { round: 1 })
        );
    }
}
